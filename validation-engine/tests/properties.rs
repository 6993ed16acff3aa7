//! Property-based checks that hold for every schema and payload

use proptest::prelude::*;
use serde_json::{Map, Value};
use validation_engine::{
    validate, ArrayRule, ErrorNode, ErrorTree, ItemErrors, LeafRule, ObjectRule, Rule, Schema,
    ValueKind,
};

const NAMES: [&str; 6] = ["a", "b", "c", "name", "qty", "items"];

fn field_name() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES.to_vec()).prop_map(String::from)
}

fn arb_payload() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z0-9@. ]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((field_name(), inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_leaf() -> impl Strategy<Value = LeafRule> {
    (
        any::<bool>(),
        prop::option::of(prop_oneof![
            Just(ValueKind::String),
            Just(ValueKind::Number),
            Just(ValueKind::Boolean),
        ]),
        prop::option::of(0.0f64..10.0),
        prop::option::of(0.0f64..100.0),
        any::<bool>(),
    )
        .prop_map(|(required, kind, min, max, email)| {
            let mut leaf = LeafRule::new();
            leaf.required = required;
            leaf.kind = kind;
            leaf.min = min;
            leaf.max = max;
            leaf.email = email;
            leaf
        })
}

fn fold_schema(fields: Vec<(String, Rule)>) -> Schema {
    fields
        .into_iter()
        .fold(Schema::new(), |schema, (name, rule)| schema.field(name, rule))
}

fn arb_schema() -> impl Strategy<Value = Schema> {
    let flat = prop::collection::vec((field_name(), arb_leaf().prop_map(Rule::from)), 0..4)
        .prop_map(fold_schema);
    flat.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(
            (
                field_name(),
                prop_oneof![
                    arb_leaf().prop_map(Rule::from),
                    inner.clone().prop_map(|fields| Rule::Object(ObjectRule::new(fields))),
                    inner.prop_map(|items| Rule::ArrayOfObjects(ArrayRule::new(items))),
                    Just(Rule::Defect("generated".to_string())),
                ],
            ),
            0..4,
        )
        .prop_map(fold_schema)
    })
}

/// Every key in the tree names a rule of the matching kind in the schema.
fn keys_within(tree: &ErrorTree, schema: &Schema) -> bool {
    tree.iter().all(|(name, node)| match (schema.get(name), node) {
        (None, _) => false,
        (Some(_), ErrorNode::Message(_)) => true,
        (Some(Rule::Object(object)), ErrorNode::Nested(nested)) => keys_within(nested, &object.fields),
        (Some(Rule::ArrayOfObjects(array)), ErrorNode::Items(items)) => {
            items.iter().all(|item| match item {
                ItemErrors::Fields(element) => keys_within(element, &array.items),
                ItemErrors::Clean | ItemErrors::Invalid(_) => true,
            })
        }
        (Some(_), _) => false,
    })
}

proptest! {
    #[test]
    fn prop_error_keys_come_from_schema(payload in arb_payload(), schema in arb_schema()) {
        let result = validate(&payload, &schema);
        prop_assert!(keys_within(&result.error, &schema));
    }

    #[test]
    fn prop_is_error_matches_tree(payload in arb_payload(), schema in arb_schema()) {
        let result = validate(&payload, &schema);
        prop_assert_eq!(result.is_error, !result.error.is_empty());
        prop_assert_eq!(result.is_error, !result.violations().is_empty());
    }

    #[test]
    fn prop_validation_is_idempotent(payload in arb_payload(), schema in arb_schema()) {
        let first = serde_json::to_string(&validate(&payload, &schema)).unwrap();
        let second = serde_json::to_string(&validate(&payload, &schema)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_empty_schema_never_errors(payload in arb_payload()) {
        prop_assert!(!validate(&payload, &Schema::new()).is_error);
    }

    #[test]
    fn prop_optional_fields_absent_are_silent(leaves in prop::collection::vec((field_name(), arb_leaf()), 0..6)) {
        let schema = leaves.into_iter().fold(Schema::new(), |schema, (name, mut leaf)| {
            leaf.required = false;
            schema.field(name, leaf)
        });
        prop_assert!(validate(&Value::Object(Map::new()), &schema).error.is_empty());
    }

    #[test]
    fn prop_required_absent_is_reported(name in field_name(), leaf in arb_leaf()) {
        let schema = Schema::new().field(name.clone(), leaf.required());
        let result = validate(&Value::Object(Map::new()), &schema);
        let expected = format!("{name} is required");
        prop_assert!(result.is_error);
        prop_assert_eq!(result.error.message(&name), Some(expected.as_str()));
    }
}
