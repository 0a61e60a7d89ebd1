//! Primitive validators.
//!
//! These are the building blocks assertion signatures use to type their
//! parameter slots. Each constructor returns a [`Validator`] handle.

use crate::invalid::{Invalid, type_name};
use crate::shape;
use crate::validator::{Validate, Validator};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Number, Value};

/// Validator backed by a closure.
struct FnValidator<F> {
    description: String,
    check: F,
}

impl<F> Validate for FnValidator<F>
where
    F: Fn(&Value) -> Result<Value, Invalid> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<Value, Invalid> {
        (self.check)(value)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

struct Anything;

impl Validate for Anything {
    fn validate(&self, value: &Value) -> Result<Value, Invalid> {
        Ok(value.clone())
    }

    fn describe(&self) -> String {
        "any".to_string()
    }

    fn accepts_anything(&self) -> bool {
        true
    }
}

/// Build a validator from a description and a closure that may coerce.
pub fn from_fn<F>(description: impl Into<String>, check: F) -> Validator
where
    F: Fn(&Value) -> Result<Value, Invalid> + Send + Sync + 'static,
{
    Validator::new(FnValidator {
        description: description.into(),
        check,
    })
}

/// Build a non-coercing validator from a boolean predicate.
pub fn predicate<F>(description: impl Into<String>, accept: F) -> Validator
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let description = description.into();
    let expected = description.clone();
    from_fn(description, move |value| {
        if accept(value) {
            Ok(value.clone())
        } else {
            Err(Invalid::mismatch(expected.as_str(), value))
        }
    })
}

/// Accepts every value unchanged.
pub fn anything() -> Validator {
    Validator::new(Anything)
}

pub fn string() -> Validator {
    predicate("string", Value::is_string)
}

pub fn number() -> Validator {
    predicate("number", Value::is_number)
}

/// Accepts integral numbers, normalising `3.0` to `3`.
pub fn integer() -> Validator {
    from_fn("integer", |value| {
        if value.is_i64() || value.is_u64() {
            return Ok(value.clone());
        }
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(Value::Number(Number::from(f as i64)))
            }
            _ => Err(Invalid::mismatch("integer", value)),
        }
    })
}

/// An [`integer`] that is zero or more; counts and sizes.
pub fn non_negative_integer() -> Validator {
    let integer = integer();
    from_fn("non-negative integer", move |value| {
        let coerced = integer
            .validate(value)
            .map_err(|_| Invalid::mismatch("non-negative integer", value))?;
        if coerced.is_u64() {
            Ok(coerced)
        } else {
            Err(Invalid::new(format!("expected non-negative integer, got {value}"))
                .with_actual(value.clone()))
        }
    })
}

pub fn boolean() -> Validator {
    predicate("boolean", Value::is_boolean)
}

pub fn null() -> Validator {
    predicate("null", Value::is_null)
}

pub fn array() -> Validator {
    predicate("array", Value::is_array)
}

pub fn object() -> Validator {
    predicate("object", Value::is_object)
}

/// Array whose every element passes `item`; elements are replaced by their
/// validated form.
pub fn array_of(item: Validator) -> Validator {
    let description = format!("array of {}", item.describe());
    from_fn(description.clone(), move |value| {
        let Some(items) = value.as_array() else {
            return Err(Invalid::mismatch(description.as_str(), value));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, each)| item.validate(each).map_err(|e| e.at(index.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    })
}

/// Exactly `expected`.
pub fn literal(expected: Value) -> Validator {
    let description = expected.to_string();
    from_fn(description, move |value| {
        if *value == expected {
            Ok(value.clone())
        } else {
            Err(Invalid::new(format!("expected {expected}, got {value}"))
                .with_expected(expected.clone())
                .with_actual(value.clone()))
        }
    })
}

/// Any one of `allowed`.
pub fn one_of(allowed: Vec<Value>) -> Validator {
    let description = allowed
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" | ");
    from_fn(description.clone(), move |value| {
        if allowed.contains(value) {
            Ok(value.clone())
        } else {
            Err(Invalid::new(format!("expected one of {description}, got {value}"))
                .with_expected(Value::Array(allowed.clone()))
                .with_actual(value.clone()))
        }
    })
}

/// String matching `pattern`.
pub fn pattern(pattern: Regex) -> Validator {
    let description = format!("string matching /{}/", pattern.as_str());
    from_fn(description.clone(), move |value| match value.as_str() {
        Some(text) if pattern.is_match(text) => Ok(value.clone()),
        Some(_) => Err(
            Invalid::new(format!("expected {description}, got {value}"))
                .with_expected(Value::String(format!("/{}/", pattern.as_str())))
                .with_actual(value.clone()),
        ),
        None => Err(Invalid::mismatch(description.as_str(), value)),
    })
}

/// Compile `source` and build a [`pattern`] validator from it.
pub fn pattern_str(source: &str) -> Result<Validator, regex::Error> {
    Regex::new(source).map(pattern)
}

/// A point in time: an RFC 3339 string or integer epoch milliseconds.
///
/// Accepted values are coerced to a normalised UTC RFC 3339 string, so two
/// spellings of the same instant compare equal downstream.
pub fn date() -> Validator {
    from_fn("date", |value| {
        let parsed: Option<DateTime<Utc>> = match value {
            Value::String(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|at| at.with_timezone(&Utc)),
            Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        };
        parsed
            .map(|at| Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
            .ok_or_else(|| Invalid::mismatch("date", value))
    })
}

/// Value that contains `expected` as a structural subset.
///
/// See [`shape::satisfies`] for the matching rules.
pub fn partial(expected: Value) -> Validator {
    let description = format!("satisfying {expected}");
    from_fn(description, move |value| {
        shape::satisfies(value, &expected).map(|()| value.clone())
    })
}

fn compare(
    description: String,
    bound: f64,
    holds: fn(f64, f64) -> bool,
) -> Validator {
    from_fn(description.clone(), move |value| match value.as_f64() {
        Some(actual) if holds(actual, bound) => Ok(value.clone()),
        Some(_) => Err(Invalid::new(format!("expected {description}, got {value}"))
            .with_expected(Value::String(description.clone()))
            .with_actual(value.clone())),
        None => Err(Invalid::mismatch("number", value)),
    })
}

pub fn greater_than(bound: f64) -> Validator {
    compare(format!("number greater than {}", render_number(bound)), bound, |a, b| a > b)
}

pub fn at_least(bound: f64) -> Validator {
    compare(format!("number at least {}", render_number(bound)), bound, |a, b| a >= b)
}

pub fn less_than(bound: f64) -> Validator {
    compare(format!("number less than {}", render_number(bound)), bound, |a, b| a < b)
}

pub fn at_most(bound: f64) -> Validator {
    compare(format!("number at most {}", render_number(bound)), bound, |a, b| a <= b)
}

/// String (counted in chars) or array with exactly `expected` elements.
pub fn length(expected: usize) -> Validator {
    let description = format!("length {expected}");
    from_fn(description, move |value| {
        let actual = match value {
            Value::String(text) => text.chars().count(),
            Value::Array(items) => items.len(),
            other => {
                return Err(Invalid::new(format!(
                    "expected a string or array, got {}",
                    type_name(other)
                ))
                .with_actual(other.clone()));
            }
        };
        if actual == expected {
            Ok(value.clone())
        } else {
            Err(Invalid::new(format!("expected length {expected}, got {actual}"))
                .with_expected(Value::from(expected))
                .with_actual(Value::from(actual)))
        }
    })
}

/// Render `3.0` as `3` and `2.5` as `2.5`.
fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
