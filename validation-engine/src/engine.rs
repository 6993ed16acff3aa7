use error_common::ViolationKind;
use serde_json::{Map, Value};

use crate::checks::check_leaf;
use crate::config::{EmptyArrayPolicy, ValidatorConfig};
use crate::report::{ErrorTree, FieldError, ItemErrors, ValidationResult};
use crate::rule::{ArrayRule, ObjectRule, Rule, Schema, ROOT_DEFECT_FIELD};

/// Validate `payload` against `schema` with the default configuration.
///
/// The schema decides which keys are visited; payload keys without a rule
/// are ignored. The payload is never modified.
pub fn validate(payload: &Value, schema: &Schema) -> ValidationResult {
    Validator::default().validate(payload, schema)
}

/// Schema-driven recursive validator
///
/// Holds only configuration, so one instance can be shared by every request
/// handler. Recursion follows schema nesting (bounded by
/// [`ValidatorConfig::max_depth`]); list elements are iterated.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn validate(&self, payload: &Value, schema: &Schema) -> ValidationResult {
        if schema.root_defect().is_some() {
            let mut tree = ErrorTree::new();
            tree.record(
                ROOT_DEFECT_FIELD,
                FieldError::new(
                    ViolationKind::SchemaDefect,
                    "schema has an invalid definition",
                ),
            );
            return ValidationResult::from_tree(tree);
        }

        // A payload root that is not a mapping behaves as one with no keys.
        let empty = Map::new();
        let fields = payload.as_object().unwrap_or(&empty);
        ValidationResult::from_tree(self.walk(fields, schema, 1))
    }

    fn walk(&self, payload: &Map<String, Value>, schema: &Schema, depth: usize) -> ErrorTree {
        let mut tree = ErrorTree::new();

        for (field, rule) in schema.iter() {
            let value = payload.get(field);
            match rule {
                Rule::Leaf(leaf) => {
                    if let Err(error) = check_leaf(field, leaf, value) {
                        tree.record(field, error);
                    }
                }
                Rule::Object(object) => self.visit_object(&mut tree, field, object, value, depth),
                Rule::ArrayOfObjects(array) => {
                    self.visit_array(&mut tree, field, array, value, depth);
                }
                Rule::Defect(_) => tree.record(field, FieldError::defect(field)),
            }
        }

        tree
    }

    fn visit_object(
        &self,
        tree: &mut ErrorTree,
        field: &str,
        rule: &ObjectRule,
        value: Option<&Value>,
        depth: usize,
    ) {
        match value {
            None | Some(Value::Null) => {
                if rule.fields.has_defects() {
                    tree.record(field, FieldError::defect(field));
                } else if rule.demands_presence() {
                    tree.record(field, FieldError::missing(field));
                }
            }
            Some(Value::Object(nested)) => {
                if depth >= self.config.max_depth {
                    tree.record(field, FieldError::too_deep(field));
                    return;
                }
                let nested_tree = self.walk(nested, &rule.fields, depth.saturating_add(1));
                tree.record_nested(field, nested_tree);
            }
            Some(_) => tree.record(field, FieldError::structural(field, "an object")),
        }
    }

    fn visit_array(
        &self,
        tree: &mut ErrorTree,
        field: &str,
        rule: &ArrayRule,
        value: Option<&Value>,
        depth: usize,
    ) {
        let items = match value {
            None | Some(Value::Null) => {
                if rule.items.has_defects() {
                    tree.record(field, FieldError::defect(field));
                } else if rule.required {
                    tree.record(field, FieldError::missing(field));
                }
                return;
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                tree.record(field, FieldError::structural(field, "a list"));
                return;
            }
        };

        if items.is_empty() {
            if self.config.empty_arrays == EmptyArrayPolicy::Reject {
                tree.record(
                    field,
                    FieldError::new(
                        ViolationKind::OutOfRange,
                        format!("{field} must contain at least one item"),
                    ),
                );
            }
            return;
        }

        if depth >= self.config.max_depth {
            tree.record(field, FieldError::too_deep(field));
            return;
        }

        let slots = items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(element) => {
                    let element_tree =
                        self.walk(element, &rule.items, depth.saturating_add(1));
                    if element_tree.is_empty() {
                        ItemErrors::Clean
                    } else {
                        ItemErrors::Fields(element_tree)
                    }
                }
                _ => ItemErrors::Invalid(FieldError::structural(
                    &format!("{field}[{index}]"),
                    "an object",
                )),
            })
            .collect();

        tree.record_items(field, slots);
    }
}
