//! Primitive checks applied to leaf values
//!
//! Each check is an independent predicate returning the violation it found.
//! [`check_leaf`] chains them in fixed precedence (type, bounds, pattern,
//! enum, email) and stops at the first failure.

use error_common::ViolationKind;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;

use crate::report::FieldError;
use crate::rule::{LeafRule, ValueKind};

/// Absent for validation purposes: `null` or a string that is blank after trimming.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Apply every constraint of `rule` to the value found under `field`.
///
/// # Errors
///
/// Returns the first violation found; later checks are skipped.
pub fn check_leaf(field: &str, rule: &LeafRule, value: Option<&Value>) -> Result<(), FieldError> {
    let value = match value {
        Some(value) if !is_blank(value) => value,
        _ => return check_presence(field, rule.required),
    };

    if let Some(kind) = rule.kind {
        check_kind(field, value, kind)?;
    }
    check_bounds(field, value, rule.min, rule.max)?;
    if let Some(pattern) = &rule.pattern {
        check_pattern(field, value, pattern)?;
    }
    if let Some(allowed) = &rule.one_of {
        check_enum(field, value, allowed)?;
    }
    if rule.email {
        check_email(field, value)?;
    }
    Ok(())
}

/// # Errors
///
/// `MissingRequired` when the field is required.
pub fn check_presence(field: &str, required: bool) -> Result<(), FieldError> {
    if required {
        Err(FieldError::missing(field))
    } else {
        Ok(())
    }
}

/// # Errors
///
/// `TypeMismatch` when the value's runtime kind differs from `kind`.
pub fn check_kind(field: &str, value: &Value, kind: ValueKind) -> Result<(), FieldError> {
    if kind.matches(value) {
        Ok(())
    } else {
        Err(FieldError::new(
            ViolationKind::TypeMismatch,
            format!("{field} must be a {kind}"),
        ))
    }
}

/// What `min`/`max` are compared against for a given value
enum Measure {
    Number(f64),
    Length(usize),
    Items(usize),
}

impl Measure {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_f64().map(Measure::Number),
            Value::String(text) => Some(Measure::Length(text.chars().count())),
            Value::Array(items) => Some(Measure::Items(items.len())),
            Value::Null | Value::Bool(_) | Value::Object(_) => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn amount(&self) -> f64 {
        match self {
            Measure::Number(number) => *number,
            Measure::Length(count) | Measure::Items(count) => *count as f64,
        }
    }

    fn describe(&self, field: &str, relation: &str, bound: f64) -> String {
        match self {
            Measure::Number(_) => format!("{field} must be {relation} {bound}"),
            Measure::Length(_) => format!("{field} must be {relation} {bound} characters long"),
            Measure::Items(_) => format!("{field} must contain {relation} {bound} items"),
        }
    }
}

/// Inclusive bounds: numerically for numbers, by character count for
/// strings, by item count for lists. Other values are not bounded.
///
/// # Errors
///
/// `OutOfRange` when the measured amount falls outside `min..=max`.
pub fn check_bounds(
    field: &str,
    value: &Value,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), FieldError> {
    let Some(measure) = Measure::of(value) else {
        return Ok(());
    };
    let amount = measure.amount();

    if let Some(min) = min {
        if amount < min {
            return Err(FieldError::new(
                ViolationKind::OutOfRange,
                measure.describe(field, "at least", min),
            ));
        }
    }
    if let Some(max) = max {
        if amount > max {
            return Err(FieldError::new(
                ViolationKind::OutOfRange,
                measure.describe(field, "at most", max),
            ));
        }
    }
    Ok(())
}

/// Strings match as-is; numbers and booleans match on their JSON text.
///
/// # Errors
///
/// `PatternMismatch` when the expression finds no match or the value is a mapping or list.
pub fn check_pattern(field: &str, value: &Value, pattern: &Regex) -> Result<(), FieldError> {
    let text: Cow<'_, str> = match value {
        Value::String(text) => Cow::Borrowed(text.as_str()),
        Value::Number(number) => Cow::Owned(number.to_string()),
        Value::Bool(flag) => Cow::Owned(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => return Err(pattern_mismatch(field)),
    };

    if pattern.is_match(&text) {
        Ok(())
    } else {
        Err(pattern_mismatch(field))
    }
}

fn pattern_mismatch(field: &str) -> FieldError {
    FieldError::new(
        ViolationKind::PatternMismatch,
        format!("{field} has an invalid format"),
    )
}

/// # Errors
///
/// `EnumViolation` unless the value is a string equal to one of `allowed`.
pub fn check_enum(field: &str, value: &Value, allowed: &[String]) -> Result<(), FieldError> {
    let accepted = value
        .as_str()
        .is_some_and(|text| allowed.iter().any(|option| option == text));

    if accepted {
        Ok(())
    } else {
        Err(FieldError::new(
            ViolationKind::EnumViolation,
            format!("{field} must be one of: {}", allowed.join(", ")),
        ))
    }
}

/// # Errors
///
/// `InvalidEmailShape` unless the value is a string shaped like an address.
pub fn check_email(field: &str, value: &Value) -> Result<(), FieldError> {
    if value.as_str().is_some_and(is_email_shaped) {
        Ok(())
    } else {
        Err(FieldError::new(
            ViolationKind::InvalidEmailShape,
            format!("{field} must be a valid email address"),
        ))
    }
}

/// Shape only: `local@domain.tld`, one `@`, no whitespace, no empty domain labels.
pub fn is_email_shaped(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
