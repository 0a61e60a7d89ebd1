//! Shapes, lengths, membership and properties.

use assay_kernel::{
    AssertionDefinition, DefinitionError, Implementation, Verdict, define_assertion, signature,
};
use assay_validate::primitives::{self, anything, array, non_negative_integer, object, string};
use assay_validate::shape;
use serde_json::Value;

pub fn definitions() -> Result<Vec<AssertionDefinition>, DefinitionError> {
    Ok(vec![
        define_assertion(
            signature!["to satisfy", anything()],
            Implementation::function(|values: &[Value]| primitives::partial(values[1].clone())),
        )?,
        define_assertion(
            signature![["to have length", "to have size"], non_negative_integer()],
            Implementation::function(|values: &[Value]| {
                match values[1].as_u64().and_then(|n| usize::try_from(n).ok()) {
                    Some(expected) => Verdict::Validate(primitives::length(expected)),
                    None => Verdict::Fail,
                }
            }),
        )?,
        define_assertion(
            signature![string(), "to contain", string()],
            Implementation::function(|values: &[Value]| {
                match (values[0].as_str(), values[1].as_str()) {
                    (Some(text), Some(needle)) => text.contains(needle),
                    _ => false,
                }
            }),
        )?,
        define_assertion(
            signature![array(), "to contain", anything()],
            Implementation::function(|values: &[Value]| {
                values[0].as_array().is_some_and(|items| {
                    items
                        .iter()
                        .any(|item| shape::satisfies(item, &values[1]).is_ok())
                })
            }),
        )?,
        empty(string(), |value| value.as_str().is_some_and(str::is_empty))?,
        empty(array(), |value| value.as_array().is_some_and(Vec::is_empty))?,
        empty(object(), |value| value.as_object().is_some_and(|map| map.is_empty()))?,
        define_assertion(
            signature![object(), "to have property", string()],
            Implementation::function(|values: &[Value]| {
                values[1]
                    .as_str()
                    .is_some_and(|key| values[0].get(key).is_some())
            }),
        )?,
        define_assertion(
            signature![object(), "to have property", string(), anything()],
            Implementation::function(|values: &[Value]| {
                let actual = values[1].as_str().and_then(|key| values[0].get(key));
                match actual {
                    Some(actual) if shape::satisfies(actual, &values[2]).is_ok() => Verdict::Pass,
                    Some(actual) => Verdict::Mismatch {
                        actual: actual.clone(),
                        expected: values[2].clone(),
                    },
                    None => Verdict::Fail,
                }
            }),
        )?,
        define_assertion(
            signature!["to be one of", array()],
            Implementation::function(|values: &[Value]| {
                primitives::one_of(values[1].as_array().cloned().unwrap_or_default())
            }),
        )?,
    ])
}

fn empty(
    subject: assay_validate::Validator,
    is_empty: fn(&Value) -> bool,
) -> Result<AssertionDefinition, DefinitionError> {
    define_assertion(
        signature![subject, "to be empty"],
        Implementation::function(move |values: &[Value]| is_empty(&values[0])),
    )
}
