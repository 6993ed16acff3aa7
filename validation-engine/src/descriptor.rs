//! Structural classification of rule descriptors
//!
//! Endpoint schemas are written as plain literals where a node's kind is
//! implied by its shape:
//!
//! - `[{ ... }]` (one field mapping inside a list) is an array-of-objects rule
//! - `{ "object": true, ... }` is an object rule whose fields are either the
//!   `fields` mapping or the sibling keys that hold mappings/lists
//! - any other mapping is a leaf (`required`, `type`, `min`, `max`,
//!   `pattern`, `enum`, `email`; unknown keys are kept as inert hints)
//!
//! Classification happens once, here, producing the closed [`Rule`] union.
//! Anything malformed becomes [`Rule::Defect`] and fails closed at
//! validation time.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, SchemaError};
use crate::rule::{ArrayRule, LeafRule, ObjectRule, Rule, Schema, ValueKind};

const OBJECT_KEYS: [&str; 3] = ["object", "required", "fields"];

impl Schema {
    /// Build a schema from a descriptor, never failing.
    ///
    /// Malformed rules are kept as defects (the affected fields will always
    /// be rejected) and reported once through `tracing`. A root that is not
    /// a mapping yields [`Schema::defective`], which rejects every payload.
    pub fn from_descriptor(descriptor: &Value) -> Self {
        let Some(fields) = descriptor.as_object() else {
            let found = value_kind_name(descriptor);
            warn!(
                found,
                "Schema descriptor root is not a mapping; every payload will be rejected"
            );
            return Schema::defective(format!("descriptor root must be a mapping, found {found}"));
        };

        let schema = schema_from_map(fields);
        let defects = schema.defects();
        if !defects.is_empty() {
            warn!(
                defects = ?defects,
                "Schema descriptor contains malformed rules; affected fields will always fail"
            );
        }
        schema
    }

    /// Build a schema from a descriptor, rejecting any malformed rule.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidRoot` when the descriptor is not a mapping
    /// and `SchemaError::Defects` listing every malformed rule path.
    pub fn try_from_descriptor(descriptor: &Value) -> Result<Self> {
        let fields = descriptor.as_object().ok_or(SchemaError::InvalidRoot)?;
        let schema = schema_from_map(fields);
        let defects = schema.defects();
        if defects.is_empty() {
            Ok(schema)
        } else {
            Err(SchemaError::Defects(defects))
        }
    }
}

fn schema_from_map(fields: &Map<String, Value>) -> Schema {
    fields
        .iter()
        .fold(Schema::new(), |schema, (name, node)| schema.field(name.as_str(), classify(node)))
}

/// Decide which kind of rule a descriptor node is.
pub fn classify(node: &Value) -> Rule {
    match node {
        Value::Array(items) => match items.as_slice() {
            [Value::Object(fields)] => Rule::ArrayOfObjects(ArrayRule::new(schema_from_map(fields))),
            _ => Rule::Defect("array rule must hold exactly one field mapping".to_string()),
        },
        Value::Object(map) if map.get("object") == Some(&Value::Bool(true)) => classify_object(map),
        Value::Object(map) => match leaf_from_map(map) {
            Ok(leaf) => Rule::Leaf(leaf),
            Err(reason) => Rule::Defect(reason),
        },
        other => Rule::Defect(format!(
            "expected a rule mapping, found {}",
            value_kind_name(other)
        )),
    }
}

fn classify_object(map: &Map<String, Value>) -> Rule {
    let fields = match map.get("fields") {
        Some(Value::Object(fields)) => schema_from_map(fields),
        Some(_) => return Rule::Defect("object rule `fields` must be a mapping".to_string()),
        None => map
            .iter()
            .filter(|(key, node)| {
                !OBJECT_KEYS.contains(&key.as_str()) && (node.is_object() || node.is_array())
            })
            .fold(Schema::new(), |schema, (name, node)| {
                schema.field(name.as_str(), classify(node))
            }),
    };

    if fields.is_empty() {
        return Rule::Defect("object rule has no fields".to_string());
    }

    let mut rule = ObjectRule::new(fields);
    match map.get("required") {
        None => {}
        Some(Value::Bool(required)) => rule.required = *required,
        Some(_) => return Rule::Defect("`required` must be a boolean".to_string()),
    }
    Rule::Object(rule)
}

fn leaf_from_map(map: &Map<String, Value>) -> std::result::Result<LeafRule, String> {
    let mut leaf = LeafRule::new();

    for (key, value) in map {
        match key.as_str() {
            "required" => leaf.required = expect_bool(key, value)?,
            "email" => leaf.email = expect_bool(key, value)?,
            "min" => leaf.min = Some(expect_number(key, value)?),
            "max" => leaf.max = Some(expect_number(key, value)?),
            "type" => {
                let name = value
                    .as_str()
                    .ok_or_else(|| "`type` must be a string".to_string())?;
                let kind =
                    ValueKind::parse(name).ok_or_else(|| format!("unknown type `{name}`"))?;
                leaf.kind = Some(kind);
            }
            "pattern" => {
                let expression = value
                    .as_str()
                    .ok_or_else(|| "`pattern` must be a string".to_string())?;
                leaf = leaf.pattern(expression).map_err(|e| e.to_string())?;
            }
            "enum" => {
                let options = value
                    .as_array()
                    .and_then(|options| {
                        options
                            .iter()
                            .map(|option| option.as_str().map(str::to_string))
                            .collect::<Option<Vec<String>>>()
                    })
                    .ok_or_else(|| "`enum` must be a list of strings".to_string())?;
                leaf.one_of = Some(options);
            }
            _ => {
                leaf.hints.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(leaf)
}

fn expect_bool(key: &str, value: &Value) -> std::result::Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("`{key}` must be a boolean"))
}

fn expect_number(key: &str, value: &Value) -> std::result::Result<f64, String> {
    value
        .as_f64()
        .ok_or_else(|| format!("`{key}` must be a number"))
}

fn value_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::validate;
    use crate::report::ErrorNode;
    use crate::rule::ROOT_DEFECT_FIELD;
    use error_common::ViolationKind;
    use serde_json::json;

    #[test]
    fn test_leaf_classification() {
        let rule = classify(&json!({
            "required": true,
            "type": "string",
            "min": 2,
            "max": 50,
            "pattern": "^[A-Z]",
            "enum": ["Acme", "Beta"],
            "email": false,
            "checkbox": true
        }));

        let Rule::Leaf(leaf) = rule else {
            panic!("expected a leaf rule");
        };
        assert!(leaf.required);
        assert_eq!(leaf.kind, Some(ValueKind::String));
        assert_eq!(leaf.min, Some(2.0));
        assert_eq!(leaf.max, Some(50.0));
        assert!(leaf.pattern.is_some());
        assert_eq!(leaf.one_of.as_deref(), Some(&["Acme".to_string(), "Beta".to_string()][..]));
        assert!(!leaf.email);
        assert_eq!(leaf.get_hint("checkbox"), Some(&json!(true)));
    }

    #[test]
    fn test_object_with_inline_fields() {
        let rule = classify(&json!({
            "object": true,
            "label": "Address",
            "city": { "required": true },
            "state": { "required": true }
        }));
        let Rule::Object(object) = rule else {
            panic!("expected an object rule");
        };
        let names: Vec<&str> = object.fields.names().collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"city") && names.contains(&"state"));
        assert!(!object.required);
        assert!(object.demands_presence());
    }

    #[test]
    fn test_object_with_fields_mapping() {
        let rule = classify(&json!({
            "object": true,
            "required": true,
            "fields": { "line1": {} }
        }));
        let Rule::Object(object) = rule else {
            panic!("expected an object rule");
        };
        assert!(object.required);
        assert!(object.fields.get("line1").is_some());
    }

    #[test]
    fn test_array_classification() {
        let rule = classify(&json!([{ "mId": { "required": true }, "qty": { "required": true } }]));
        let Rule::ArrayOfObjects(array) = rule else {
            panic!("expected an array rule");
        };
        assert!(array.required);
        assert_eq!(array.items.len(), 2);
    }

    #[test]
    fn test_defects() {
        let cases = [
            json!({ "object": true }),
            json!({ "object": true, "fields": "city" }),
            json!({ "object": true, "city": {}, "required": "yes" }),
            json!([]),
            json!([{ "a": {} }, { "b": {} }]),
            json!(["a"]),
            json!("required"),
            json!({ "type": "date" }),
            json!({ "type": 5 }),
            json!({ "min": "1" }),
            json!({ "pattern": "([0-9" }),
            json!({ "enum": ["a", 1] }),
            json!({ "required": "true" }),
        ];
        for case in cases {
            assert!(
                matches!(classify(&case), Rule::Defect(_)),
                "expected a defect for {case}"
            );
        }
    }

    #[test]
    fn test_object_false_is_a_leaf() {
        assert!(matches!(classify(&json!({ "object": false })), Rule::Leaf(_)));
    }

    #[test]
    fn test_strict_and_lenient_construction() {
        let descriptor = json!({
            "name": { "required": true },
            "address": { "object": true }
        });

        let lenient = Schema::from_descriptor(&descriptor);
        assert_eq!(lenient.len(), 2);
        assert!(matches!(lenient.get("address"), Some(Rule::Defect(_))));

        match Schema::try_from_descriptor(&descriptor) {
            Err(SchemaError::Defects(defects)) => {
                assert_eq!(defects, vec!["address: object rule has no fields"]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        assert!(matches!(
            Schema::try_from_descriptor(&json!([1])),
            Err(SchemaError::InvalidRoot)
        ));
    }

    #[test]
    fn test_non_mapping_root_fails_closed() {
        let roots = [
            json!([{ "name": { "required": true } }]),
            json!("required"),
            json!(null),
        ];
        for descriptor in roots {
            let schema = Schema::from_descriptor(&descriptor);
            assert!(schema.is_empty());
            assert!(schema.root_defect().is_some(), "{descriptor} should be defective");

            let result = validate(&json!({}), &schema);
            assert!(result.is_error, "{descriptor} accepted an empty payload");
            let error = result
                .error
                .get(ROOT_DEFECT_FIELD)
                .and_then(ErrorNode::as_message)
                .unwrap();
            assert_eq!(error.kind, ViolationKind::SchemaDefect);

            assert!(validate(&json!({ "name": "Acme" }), &schema).is_error);
        }
    }

    #[test]
    fn test_descriptor_order_is_preserved() {
        let descriptor: Value =
            serde_json::from_str(r#"{"zeta": {}, "alpha": {}, "mid": {}}"#).unwrap();
        let schema = Schema::from_descriptor(&descriptor);
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
