//! Rule and schema model
//!
//! A [`Schema`] is an ordered list of `(field name, Rule)` pairs. Each
//! [`Rule`] is one of a closed set of shapes, decided when the schema is
//! built, so evaluation never has to probe a rule for marker fields.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SchemaError};

/// Runtime kind a leaf value can be required to have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
}

impl ValueKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ValueKind::String),
            "number" => Some(ValueKind::Number),
            "boolean" => Some(ValueKind::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Number => value.is_number(),
            ValueKind::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint set for a scalar field
///
/// Every constraint is optional; an unset constraint is simply not checked.
/// `hints` keeps keys the engine does not interpret (`checkbox`, `select`,
/// labels for form rendering, ...). They never affect the outcome.
#[derive(Debug, Clone, Default)]
pub struct LeafRule {
    pub required: bool,
    pub kind: Option<ValueKind>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Regex>,
    pub one_of: Option<Vec<String>>,
    pub email: bool,
    pub hints: BTreeMap<String, Value>,
}

impl LeafRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Compile `expression` with the `regex` crate and attach it.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidPattern` if the expression does not compile.
    pub fn pattern(self, expression: &str) -> Result<Self> {
        let regex = Regex::new(expression).map_err(|e| SchemaError::InvalidPattern {
            pattern: expression.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.pattern_regex(regex))
    }

    pub fn pattern_regex(mut self, regex: Regex) -> Self {
        self.pattern = Some(regex);
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn hint(mut self, key: impl Into<String>, value: Value) -> Self {
        self.hints.insert(key.into(), value);
        self
    }

    pub fn get_hint(&self, key: &str) -> Option<&Value> {
        self.hints.get(key)
    }
}

/// Nested mapping validated against its own field list
#[derive(Debug, Clone)]
pub struct ObjectRule {
    pub required: bool,
    pub fields: Schema,
}

impl ObjectRule {
    pub fn new(fields: Schema) -> Self {
        Self {
            required: false,
            fields,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// An absent object is reported when it is marked required itself or
    /// when any of its fields would be reported as missing.
    pub fn demands_presence(&self) -> bool {
        self.required || self.fields.demands_presence()
    }
}

/// Sequence whose every element is validated against one shared field list
///
/// Required unless built with [`ArrayRule::optional`]; the descriptor form
/// `[{ ... }]` always produces a required rule.
#[derive(Debug, Clone)]
pub struct ArrayRule {
    pub required: bool,
    pub items: Schema,
}

impl ArrayRule {
    pub fn new(items: Schema) -> Self {
        Self {
            required: true,
            items,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A single field's rule, classified when the schema is built
#[derive(Debug, Clone)]
pub enum Rule {
    Leaf(LeafRule),
    Object(ObjectRule),
    ArrayOfObjects(ArrayRule),
    /// Malformed rule node; the field always fails with a schema-defect message
    Defect(String),
}

impl Rule {
    pub fn demands_presence(&self) -> bool {
        match self {
            Rule::Leaf(leaf) => leaf.required,
            Rule::Object(object) => object.demands_presence(),
            Rule::ArrayOfObjects(array) => array.required,
            Rule::Defect(_) => true,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Rule::Leaf(_) => "leaf",
            Rule::Object(_) => "object",
            Rule::ArrayOfObjects(_) => "array",
            Rule::Defect(_) => "defect",
        }
    }
}

impl From<LeafRule> for Rule {
    fn from(rule: LeafRule) -> Self {
        Rule::Leaf(rule)
    }
}

impl From<ObjectRule> for Rule {
    fn from(rule: ObjectRule) -> Self {
        Rule::Object(rule)
    }
}

impl From<ArrayRule> for Rule {
    fn from(rule: ArrayRule) -> Self {
        Rule::ArrayOfObjects(rule)
    }
}

/// Error-tree key used when the schema as a whole is malformed
pub const ROOT_DEFECT_FIELD: &str = "schema";

/// Ordered mapping from field name to rule, object-shaped at the root
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Rule)>,
    root_defect: Option<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema that could not be built at all; it rejects every payload.
    pub fn defective(reason: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            root_defect: Some(reason.into()),
        }
    }

    pub fn root_defect(&self) -> Option<&str> {
        self.root_defect.as_deref()
    }

    /// Builder form of [`Schema::insert`].
    pub fn field(mut self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.insert(name, rule);
        self
    }

    /// Add a rule; a second rule for the same name replaces the first in place.
    pub fn insert(&mut self, name: impl Into<String>, rule: impl Into<Rule>) {
        let name = name.into();
        let rule = rule.into();
        if let Some(slot) = self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = rule;
        } else {
            self.fields.push((name, rule));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn demands_presence(&self) -> bool {
        self.root_defect.is_some() || self.fields.iter().any(|(_, rule)| rule.demands_presence())
    }

    /// True when this schema or any nested one holds a malformed rule.
    pub fn has_defects(&self) -> bool {
        self.root_defect.is_some()
            || self.fields.iter().any(|(_, rule)| match rule {
                Rule::Defect(_) => true,
                Rule::Object(object) => object.fields.has_defects(),
                Rule::ArrayOfObjects(array) => array.items.has_defects(),
                Rule::Leaf(_) => false,
            })
    }

    /// Nesting depth: 1 for a flat schema, +1 per nested object or array level.
    pub fn depth(&self) -> usize {
        let nested = self
            .fields
            .iter()
            .map(|(_, rule)| match rule {
                Rule::Object(object) => object.fields.depth(),
                Rule::ArrayOfObjects(array) => array.items.depth(),
                Rule::Leaf(_) | Rule::Defect(_) => 0,
            })
            .max()
            .unwrap_or(0);
        nested.saturating_add(1)
    }

    /// Paths of every defective rule, e.g. `address.city` or `medicines[].qty`.
    pub fn defects(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_defects("", &mut found);
        found
    }

    fn collect_defects(&self, prefix: &str, found: &mut Vec<String>) {
        if let Some(reason) = &self.root_defect {
            let path = if prefix.is_empty() { ROOT_DEFECT_FIELD } else { prefix };
            found.push(format!("{path}: {reason}"));
        }
        for (name, rule) in &self.fields {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match rule {
                Rule::Defect(reason) => found.push(format!("{path}: {reason}")),
                Rule::Object(object) => object.fields.collect_defects(&path, found),
                Rule::ArrayOfObjects(array) => {
                    array.items.collect_defects(&format!("{path}[]"), found);
                }
                Rule::Leaf(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_kind_parse() {
        assert_eq!(ValueKind::parse("number"), Some(ValueKind::Number));
        assert_eq!(ValueKind::parse("date"), None);
        assert!(ValueKind::Boolean.matches(&json!(false)));
        assert!(!ValueKind::String.matches(&json!(1)));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let schema = Schema::new()
            .field("a", LeafRule::new())
            .field("b", LeafRule::new())
            .field("a", LeafRule::new().required());

        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(matches!(schema.get("a"), Some(Rule::Leaf(leaf)) if leaf.required));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = LeafRule::new().pattern("([0-9");
        assert!(matches!(result, Err(SchemaError::InvalidPattern { .. })));
    }

    #[test]
    fn test_object_demands_presence_from_nested_required() {
        let lenient = ObjectRule::new(Schema::new().field("city", LeafRule::new()));
        assert!(!lenient.demands_presence());

        let strict = ObjectRule::new(Schema::new().field("city", LeafRule::new().required()));
        assert!(strict.demands_presence());
        assert!(lenient.required().demands_presence());
    }

    #[test]
    fn test_depth_and_defects() {
        let schema = Schema::new()
            .field("name", LeafRule::new())
            .field(
                "medicines",
                ArrayRule::new(
                    Schema::new()
                        .field("mId", LeafRule::new().required())
                        .field("dose", Rule::Defect("fields missing".to_string())),
                ),
            );

        assert_eq!(schema.depth(), 2);
        assert_eq!(schema.defects(), vec!["medicines[].dose: fields missing"]);
    }

    #[test]
    fn test_has_defects_sees_nested_and_root() {
        let clean = Schema::new().field("name", LeafRule::new().required());
        assert!(!clean.has_defects());

        let nested = Schema::new().field(
            "address",
            ObjectRule::new(Schema::new().field("city", Rule::Defect("bad".to_string()))),
        );
        assert!(nested.has_defects());

        let root = Schema::defective("descriptor root is a list");
        assert!(root.has_defects());
        assert!(root.demands_presence());
        assert_eq!(root.root_defect(), Some("descriptor root is a list"));
        assert_eq!(root.defects(), vec!["schema: descriptor root is a list"]);
    }

    #[test]
    fn test_kind_names() {
        let leaf: Rule = LeafRule::new().into();
        let object: Rule = ObjectRule::new(Schema::new()).into();
        let array: Rule = ArrayRule::new(Schema::new()).into();
        let names: Vec<&str> = [leaf, object, array, Rule::Defect(String::new())]
            .iter()
            .map(Rule::kind_name)
            .collect();
        assert_eq!(names, vec!["leaf", "object", "array", "defect"]);
    }
}
