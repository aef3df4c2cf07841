//! Canonical JSON encoding.
//!
//! The canonical form is RFC 8785 (JSON Canonicalization Scheme): object members
//! sorted by key, no insignificant whitespace, `,` and `:` separators, minimal
//! string escaping and ECMAScript number formatting (`1` and `1.0` both encode as
//! `1`). Two implementations that disagree on any of these rules will disagree on
//! every digest, so this encoding must not change without a format version bump.

use crate::finite::{check_finite, FiniteCheckError};
use canonical_json::to_string;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Maximum nesting depth accepted by the default canonicalizer.
pub const MAX_DEPTH: usize = 128;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// The input could not be represented as a JSON value (e.g. a map with
    /// non-string keys).
    #[error("unsupported value: {0}")]
    Serialization(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Nesting exceeded the configured depth limit.
    #[error("value nested deeper than {max} levels at {path}")]
    TooDeep {
        /// Path where the limit was crossed.
        path: String,
        /// Configured limit.
        max: usize,
    },
    /// Generic failure from the encoder.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn depth(&self) -> usize {
        self.segments.len()
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic bytes.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    max_depth: usize,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer with the default depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a canonicalizer with a custom depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Produces the canonical bytes for a JSON value.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        self.validate(value, Path::root())?;

        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    /// Converts any serializable value to JSON and canonicalizes it.
    ///
    /// NaN and infinities fail with [`CanonicalizationError::NonFiniteNumber`]
    /// instead of being encoded as `null`.
    pub fn canonicalize_serializable<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        check_finite(value).map_err(|err| match err {
            FiniteCheckError::NonFinite(path) => CanonicalizationError::NonFiniteNumber(path),
            FiniteCheckError::Custom(msg) => CanonicalizationError::Serialization(msg),
        })?;
        let value = serde_json::to_value(value)
            .map_err(|err| CanonicalizationError::Serialization(err.to_string()))?;
        self.canonicalize(&value)
    }

    fn validate(&self, value: &Value, path: Path) -> Result<(), CanonicalizationError> {
        if path.depth() > self.max_depth {
            return Err(CanonicalizationError::TooDeep {
                path: path.to_string(),
                max: self.max_depth,
            });
        }

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.validate(child, path.push_field(key))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate(item, path.push_index(idx))?;
                }
                Ok(())
            }
            Value::Number(num) => match num.as_f64() {
                Some(f) if !f.is_finite() => {
                    Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
                }
                _ => Ok(()),
            },
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}

/// Canonicalizes a serializable value with the default canonicalizer.
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonicalizationError> {
    Canonicalizer::default().canonicalize_serializable(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_sorts_keys_and_drops_whitespace() {
        let bytes = canonicalize(&json!({"b": [1, 2], "a": {"y": null, "x": true}})).unwrap();
        assert_eq!(bytes, br#"{"a":{"x":true,"y":null},"b":[1,2]}"#.to_vec());
    }

    #[test]
    fn test_sequence_order_is_significant() {
        let a = canonicalize(&json!([1, 2, 3])).unwrap();
        let b = canonicalize(&json!([3, 2, 1])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_null_and_empty_map_differ() {
        let absent = canonicalize(&json!({"vault_state": null})).unwrap();
        let empty = canonicalize(&json!({"vault_state": {}})).unwrap();
        assert_ne!(absent, empty);
    }

    #[test]
    fn test_non_string_keys_rejected() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "pair");
        let err = canonicalize(&map).unwrap_err();
        assert!(matches!(err, CanonicalizationError::Serialization(_)));
    }

    #[derive(Serialize)]
    struct Sample {
        x: f64,
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            match canonicalize(&Sample { x }) {
                Err(CanonicalizationError::NonFiniteNumber(path)) => assert_eq!(path, "x"),
                other => panic!("expected NonFiniteNumber for {x}, got {other:?}"),
            }
        }
        assert_eq!(canonicalize(&Sample { x: 1.5 }).unwrap(), br#"{"x":1.5}"#.to_vec());
        assert!(canonicalize(&json!({"x": null})).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let mut value = json!("leaf");
        for _ in 0..5 {
            value = json!({ "k": value });
        }
        let canonicalizer = Canonicalizer::with_max_depth(3);
        let err = canonicalizer.canonicalize(&value).unwrap_err();
        match err {
            CanonicalizationError::TooDeep { path, max } => {
                assert_eq!(max, 3);
                assert_eq!(path, "k.k.k.k");
            }
            other => panic!("expected TooDeep, got {other:?}"),
        }
        assert!(Canonicalizer::new().canonicalize(&value).is_ok());
    }
}
