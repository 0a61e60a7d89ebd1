//! Type names and truthiness.

use assay_kernel::{
    AssertionDefinition, DefinitionError, Implementation, define_assertion, signature,
};
use assay_validate::primitives::{self, one_of};
use assay_validate::{Validator, type_name};
use serde_json::Value;

/// Names accepted by `to be a` / `to be an`.
pub const TYPE_NAMES: [&str; 8] = [
    "string", "number", "integer", "boolean", "null", "array", "object", "date",
];

pub fn definitions() -> Result<Vec<AssertionDefinition>, DefinitionError> {
    let names = TYPE_NAMES.iter().map(|name| Value::from(*name)).collect();
    Ok(vec![
        define_assertion(
            signature![["to be a", "to be an"], one_of(names)],
            Implementation::function(|values: &[Value]| {
                validator_for(values[1].as_str().unwrap_or_default())
            }),
        )?,
        define_assertion(["to be truthy"], primitives::predicate("truthy", truthy))?,
        define_assertion(
            ["to be falsy"],
            primitives::predicate("falsy", |value| !truthy(value)),
        )?,
        define_assertion(["to be null"], primitives::null())?,
    ])
}

fn validator_for(name: &str) -> Validator {
    match name {
        "string" => primitives::string(),
        "number" => primitives::number(),
        "integer" => primitives::integer(),
        "boolean" => primitives::boolean(),
        "null" => primitives::null(),
        "array" => primitives::array(),
        "object" => primitives::object(),
        "date" => primitives::date(),
        other => {
            let other = other.to_string();
            primitives::predicate(other.clone(), move |value| type_name(value) == other)
        }
    }
}

/// `null`, `false`, `0` and `""` are falsy; everything else is truthy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
