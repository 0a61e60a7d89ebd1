//! Structural subset matching ("satisfies").
//!
//! - objects: every key of `expected` must be present in `actual` and its
//!   value must satisfy the expected value; extra keys are ignored
//! - arrays: same length, element-wise satisfaction
//! - numbers: numeric equality (`1` satisfies `1.0`)
//! - everything else: plain equality

use crate::invalid::{Invalid, type_name};
use serde_json::Value;

pub fn satisfies(actual: &Value, expected: &Value) -> Result<(), Invalid> {
    match (expected, actual) {
        (Value::Object(want), Value::Object(have)) => {
            for (key, want_value) in want {
                match have.get(key) {
                    Some(have_value) => {
                        satisfies(have_value, want_value).map_err(|e| e.at(key.clone()))?
                    }
                    None => {
                        return Err(Invalid::new(format!("missing property {key:?}"))
                            .with_expected(want_value.clone())
                            .at(key.clone()));
                    }
                }
            }
            Ok(())
        }
        (Value::Array(want), Value::Array(have)) => {
            if want.len() != have.len() {
                return Err(Invalid::new(format!(
                    "expected {} elements, got {}",
                    want.len(),
                    have.len()
                ))
                .with_expected(expected.clone())
                .with_actual(actual.clone()));
            }
            for (index, (have_value, want_value)) in have.iter().zip(want).enumerate() {
                satisfies(have_value, want_value).map_err(|e| e.at(index.to_string()))?;
            }
            Ok(())
        }
        (Value::Number(want), Value::Number(have)) if want.as_f64() == have.as_f64() => Ok(()),
        (Value::Object(_) | Value::Array(_), _) => Err(Invalid::new(format!(
            "expected {}, got {}",
            type_name(expected),
            type_name(actual)
        ))
        .with_expected(expected.clone())
        .with_actual(actual.clone())),
        _ if expected == actual => Ok(()),
        _ => Err(Invalid::new(format!("expected {expected}, got {actual}"))
            .with_expected(expected.clone())
            .with_actual(actual.clone())),
    }
}
