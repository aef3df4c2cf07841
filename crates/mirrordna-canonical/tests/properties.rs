//! Property-based tests for canonicalization and digest guarantees

use mirrordna_canonical::{digest_text, digest_value};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn nested_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Rebuilds every object with its entries inserted in reverse order.
fn reinsert_reversed(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut rebuilt = Map::new();
            for (key, child) in map.iter().rev() {
                rebuilt.insert(key.clone(), reinsert_reversed(child));
            }
            Value::Object(rebuilt)
        }
        Value::Array(items) => Value::Array(items.iter().map(reinsert_reversed).collect()),
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn digest_ignores_key_insertion_order(value in nested_value()) {
        let permuted = reinsert_reversed(&value);
        prop_assert_eq!(digest_value(&value).unwrap(), digest_value(&permuted).unwrap());
    }

    #[test]
    fn digest_detects_changed_leaf(
        map in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 1..8),
        delta in 1i64..1000,
    ) {
        let original: Map<String, Value> =
            map.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
        let mut changed = original.clone();
        let (key, value) = map.iter().next().unwrap();
        changed.insert(key.clone(), Value::from(value.wrapping_add(delta)));

        prop_assert_ne!(
            digest_value(&Value::Object(original)).unwrap(),
            digest_value(&Value::Object(changed)).unwrap()
        );
    }

    #[test]
    fn text_digest_ignores_crlf(lines in prop::collection::vec("[a-zA-Z0-9 ]{0,20}[a-zA-Z0-9]", 0..8)) {
        let unix = lines.join("\n");
        let windows = unix.replace('\n', "\r\n");
        prop_assert_eq!(digest_text(&unix, true), digest_text(&windows, true));
    }
}
