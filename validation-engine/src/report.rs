//! Error tree assembled during evaluation
//!
//! The tree mirrors the schema, not the payload, and only ever holds
//! violations: a field that passed has no entry, a nested object that passed
//! has no entry, and a list is attached only when at least one element failed.
//! Because nothing clean is stored, "is there any error" is answered by
//! looking at the root alone.

use error_common::{FieldViolation, ViolationKind};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::error::ValidationFailed;

/// Message recorded for one failing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(ViolationKind::MissingRequired, format!("{field} is required"))
    }

    pub fn structural(field: &str, expected: &str) -> Self {
        Self::new(
            ViolationKind::StructuralMismatch,
            format!("{field} must be {expected}"),
        )
    }

    pub fn too_deep(field: &str) -> Self {
        Self::new(
            ViolationKind::StructuralMismatch,
            format!("{field} exceeds the maximum nesting depth"),
        )
    }

    pub fn defect(field: &str) -> Self {
        Self::new(
            ViolationKind::SchemaDefect,
            format!("{field} has an invalid schema definition"),
        )
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Clients only ever see the message string.
impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.message)
    }
}

/// Outcome for one element of a validated list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemErrors {
    Clean,
    Fields(ErrorTree),
    /// The element was not a mapping at all
    Invalid(FieldError),
}

impl ItemErrors {
    pub fn is_clean(&self) -> bool {
        matches!(self, ItemErrors::Clean)
    }

    pub fn as_fields(&self) -> Option<&ErrorTree> {
        match self {
            ItemErrors::Fields(tree) => Some(tree),
            _ => None,
        }
    }
}

impl Serialize for ItemErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ItemErrors::Clean => serializer.serialize_map(Some(0))?.end(),
            ItemErrors::Fields(tree) => tree.serialize(serializer),
            ItemErrors::Invalid(error) => error.serialize(serializer),
        }
    }
}

/// Value stored under a field name in an [`ErrorTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorNode {
    Message(FieldError),
    Nested(ErrorTree),
    Items(Vec<ItemErrors>),
}

impl ErrorNode {
    pub fn as_message(&self) -> Option<&FieldError> {
        match self {
            ErrorNode::Message(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&ErrorTree> {
        match self {
            ErrorNode::Nested(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&[ItemErrors]> {
        match self {
            ErrorNode::Items(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for ErrorNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorNode::Message(error) => error.serialize(serializer),
            ErrorNode::Nested(tree) => tree.serialize(serializer),
            ErrorNode::Items(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Field-name keyed violations, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
    entries: Vec<(String, ErrorNode)>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: &str) -> Option<&ErrorNode> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, node)| node)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Message text for a leaf violation
    pub fn message(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(ErrorNode::as_message)
            .map(|error| error.message.as_str())
    }

    pub fn nested(&self, field: &str) -> Option<&ErrorTree> {
        self.get(field).and_then(ErrorNode::as_nested)
    }

    pub fn items(&self, field: &str) -> Option<&[ItemErrors]> {
        self.get(field).and_then(ErrorNode::as_items)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub(crate) fn record(&mut self, field: &str, error: FieldError) {
        self.entries
            .push((field.to_string(), ErrorNode::Message(error)));
    }

    pub(crate) fn record_nested(&mut self, field: &str, tree: ErrorTree) {
        if !tree.is_empty() {
            self.entries.push((field.to_string(), ErrorNode::Nested(tree)));
        }
    }

    pub(crate) fn record_items(&mut self, field: &str, items: Vec<ItemErrors>) {
        if items.iter().any(|item| !item.is_clean()) {
            self.entries.push((field.to_string(), ErrorNode::Items(items)));
        }
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<FieldViolation>) {
        for (name, node) in &self.entries {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match node {
                ErrorNode::Message(error) => {
                    out.push(FieldViolation::new(path, error.kind, error.message.clone()));
                }
                ErrorNode::Nested(tree) => tree.flatten_into(&path, out),
                ErrorNode::Items(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{path}[{index}]");
                        match item {
                            ItemErrors::Clean => {}
                            ItemErrors::Fields(tree) => tree.flatten_into(&item_path, out),
                            ItemErrors::Invalid(error) => out.push(FieldViolation::new(
                                item_path,
                                error.kind,
                                error.message.clone(),
                            )),
                        }
                    }
                }
            }
        }
    }

    /// Every violation in the tree with its dotted path, depth first in schema order
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

/// Result of one `validate` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "isError")]
    pub is_error: bool,
    pub error: ErrorTree,
}

impl ValidationResult {
    pub(crate) fn from_tree(error: ErrorTree) -> Self {
        Self {
            is_error: !error.is_empty(),
            error,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.is_error
    }

    pub fn violations(&self) -> Vec<FieldViolation> {
        self.error.violations()
    }

    /// Messages grouped by field path, as carried in API error bodies
    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for violation in self.violations() {
            grouped
                .entry(violation.path)
                .or_default()
                .push(violation.message);
        }
        grouped
    }

    /// # Errors
    ///
    /// Returns `ValidationFailed` carrying the error tree when any field was rejected.
    pub fn into_result(self) -> Result<(), ValidationFailed> {
        if self.is_error {
            Err(ValidationFailed { error: self.error })
        } else {
            Ok(())
        }
    }
}
