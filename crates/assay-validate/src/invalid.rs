//! Rejection detail produced by a validator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Why a value failed validation.
///
/// `expected` / `actual` are carried when the validator can state them, so
/// that downstream diff renderers have something concrete to compare.
/// `path` locates the offending value inside a nested structure, outermost
/// segment first.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{}", render(.path, .message))]
pub struct Invalid {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

impl Invalid {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
            path: Vec::new(),
        }
    }

    /// Shorthand for the common "expected X, got Y" rejection.
    pub fn mismatch(expected: impl Into<String>, actual: &Value) -> Self {
        let expected = expected.into();
        Self::new(format!("expected {expected}, got {}", type_name(actual)))
            .with_actual(actual.clone())
    }

    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    /// Prefix the location with one more (outer) path segment.
    pub fn at(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }
}

fn render(path: &[String], message: &str) -> String {
    if path.is_empty() {
        message.to_string()
    } else {
        format!("at {}: {message}", path.join("."))
    }
}

/// JSON type name used in rejection messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
