//! Write-path schemas for the healthcare endpoints
//!
//! Each schema is written as a descriptor literal and classified once, the
//! first time it is used. Callers pick the schema for their endpoint and pass
//! it to [`crate::validate`] explicitly; nothing here is consulted implicitly.

use lazy_static::lazy_static;
use serde_json::{json, Value};
use tracing::debug;

use crate::rule::Schema;

/// Ten-digit mobile number starting with 6-9
pub const PHONE_PATTERN: &str = r"^[6-9]\d{9}$";
pub const PINCODE_PATTERN: &str = r"^\d{6}$";
pub const DATE_PATTERN: &str = r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$";
pub const TIME_PATTERN: &str = r"^([01]\d|2[0-3]):[0-5]\d$";

/// Names accepted by [`lookup`]
pub const ENDPOINTS: [&str; 9] = [
    "appointment",
    "clinic",
    "doctor",
    "invoice",
    "patient",
    "prescription",
    "receptionist",
    "supplier",
    "user",
];

fn build(endpoint: &str, descriptor: &Value) -> Schema {
    let schema = Schema::from_descriptor(descriptor);
    debug!(
        endpoint,
        fields = schema.len(),
        depth = schema.depth(),
        "Endpoint schema built"
    );
    schema
}

lazy_static! {
    static ref APPOINTMENT: Schema = build("appointment", &json!({
        "clinic": { "required": true },
        "doctor": { "required": true },
        "patient": { "required": true },
        "date": { "required": true, "pattern": DATE_PATTERN },
        "time": { "required": true, "pattern": TIME_PATTERN },
        "status": { "enum": ["scheduled", "completed", "cancelled"], "select": true },
        "reason": { "type": "string", "max": 500 },
        "sendReminder": { "type": "boolean", "checkbox": true }
    }));

    static ref CLINIC: Schema = build("clinic", &json!({
        "name": { "required": true, "type": "string", "min": 2, "max": 100 },
        "phone": { "required": true, "pattern": PHONE_PATTERN },
        "email": { "required": true, "email": true },
        "address": {
            "object": true,
            "line1": { "required": true },
            "city": { "required": true },
            "state": { "required": true },
            "pincode": { "pattern": PINCODE_PATTERN }
        },
        "registrationNumber": { "type": "string", "max": 50 }
    }));

    static ref DOCTOR: Schema = build("doctor", &json!({
        "clinic": { "required": true },
        "name": { "required": true, "type": "string", "min": 2, "max": 100 },
        "email": { "required": true, "email": true },
        "phone": { "required": true, "pattern": PHONE_PATTERN },
        "specialization": { "required": true, "type": "string" },
        "experience": { "type": "number", "min": 0, "max": 60 },
        "consultationFee": { "type": "number", "min": 0 },
        "gender": { "enum": ["male", "female", "other"], "select": true }
    }));

    static ref INVOICE: Schema = build("invoice", &json!({
        "clinic": { "required": true },
        "patient": { "required": true },
        "items": [{
            "description": { "required": true, "type": "string" },
            "qty": { "required": true, "type": "number", "min": 1 },
            "price": { "required": true, "type": "number", "min": 0 }
        }],
        "discount": { "type": "number", "min": 0, "max": 100 },
        "paymentMode": {
            "required": true,
            "enum": ["cash", "card", "upi", "insurance"],
            "select": true
        },
        "status": { "enum": ["paid", "pending", "cancelled"] }
    }));

    static ref PATIENT: Schema = build("patient", &json!({
        "clinic": { "required": true },
        "name": { "required": true, "type": "string", "min": 2, "max": 100 },
        "phone": { "required": true, "pattern": PHONE_PATTERN },
        "email": { "email": true },
        "age": { "type": "number", "min": 0, "max": 150 },
        "gender": { "required": true, "enum": ["male", "female", "other"], "select": true },
        "bloodGroup": { "enum": ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"], "select": true },
        "address": {
            "object": true,
            "city": {},
            "state": {},
            "pincode": { "pattern": PINCODE_PATTERN }
        }
    }));

    static ref PRESCRIPTION: Schema = build("prescription", &json!({
        "clinic": { "required": true },
        "doctor": { "required": true },
        "patient": { "required": true },
        "diagnosis": { "type": "string", "max": 1000 },
        "medicines": [{
            "mId": { "required": true },
            "name": { "required": true, "type": "string" },
            "dosage": { "required": true },
            "qty": { "required": true, "type": "number", "min": 1 },
            "duration": { "type": "string" },
            "instructions": { "type": "string", "max": 250 }
        }],
        "followUpDate": { "pattern": DATE_PATTERN }
    }));

    static ref RECEPTIONIST: Schema = build("receptionist", &json!({
        "clinic": { "required": true },
        "name": { "required": true, "type": "string", "min": 2, "max": 100 },
        "email": { "required": true, "email": true },
        "phone": { "required": true, "pattern": PHONE_PATTERN },
        "shift": { "enum": ["morning", "evening", "night"], "select": true }
    }));

    static ref SUPPLIER: Schema = build("supplier", &json!({
        "clinic": { "required": true },
        "name": { "required": true },
        "phone": { "required": true, "pattern": PHONE_PATTERN },
        "email": { "email": true },
        "address": {
            "object": true,
            "city": { "required": true },
            "state": { "required": true }
        }
    }));

    static ref USER: Schema = build("user", &json!({
        "name": { "required": true, "type": "string", "min": 2, "max": 100 },
        "email": { "required": true, "email": true },
        "password": { "required": true, "type": "string", "min": 8, "max": 128 },
        "role": {
            "required": true,
            "enum": ["admin", "doctor", "receptionist", "patient"],
            "select": true
        },
        "phone": { "pattern": PHONE_PATTERN },
        "acceptTerms": { "required": true, "type": "boolean", "checkbox": true }
    }));
}

pub fn appointment() -> &'static Schema {
    &APPOINTMENT
}

pub fn clinic() -> &'static Schema {
    &CLINIC
}

pub fn doctor() -> &'static Schema {
    &DOCTOR
}

pub fn invoice() -> &'static Schema {
    &INVOICE
}

pub fn patient() -> &'static Schema {
    &PATIENT
}

pub fn prescription() -> &'static Schema {
    &PRESCRIPTION
}

pub fn receptionist() -> &'static Schema {
    &RECEPTIONIST
}

pub fn supplier() -> &'static Schema {
    &SUPPLIER
}

pub fn user() -> &'static Schema {
    &USER
}

/// Schema for an endpoint name listed in [`ENDPOINTS`]
pub fn lookup(endpoint: &str) -> Option<&'static Schema> {
    match endpoint {
        "appointment" => Some(appointment()),
        "clinic" => Some(clinic()),
        "doctor" => Some(doctor()),
        "invoice" => Some(invoice()),
        "patient" => Some(patient()),
        "prescription" => Some(prescription()),
        "receptionist" => Some(receptionist()),
        "supplier" => Some(supplier()),
        "user" => Some(user()),
        _ => None,
    }
}
