// Validator configuration
use serde::{Deserialize, Serialize};

/// What an array-of-objects rule does with an empty list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyArrayPolicy {
    /// No element, so no element can violate a sub-rule
    #[default]
    Accept,
    /// Report the field as out of range
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Deepest nested object/array level the engine descends into
    pub max_depth: usize,
    pub empty_arrays: EmptyArrayPolicy,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: 16,
            empty_arrays: EmptyArrayPolicy::Accept,
        }
    }
}

impl ValidatorConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_empty_arrays(mut self, policy: EmptyArrayPolicy) -> Self {
        self.empty_arrays = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.empty_arrays, EmptyArrayPolicy::Accept);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{"empty_arrays": "reject"}"#).unwrap();
        assert_eq!(config.empty_arrays, EmptyArrayPolicy::Reject);
        assert_eq!(config.max_depth, 16);
    }
}
