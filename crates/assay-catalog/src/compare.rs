//! Equality and numeric ordering.

use assay_kernel::{
    AssertionDefinition, DefinitionError, Implementation, Verdict, define_assertion, signature,
};
use assay_validate::primitives::{self, anything, number};
use assay_validate::shape;
use serde_json::Value;

pub fn definitions() -> Result<Vec<AssertionDefinition>, DefinitionError> {
    Ok(vec![
        // Same JSON value, no numeric leniency.
        define_assertion(
            signature!["to be", anything()],
            Implementation::function(|values: &[Value]| same(&values[0], &values[1])),
        )?,
        define_assertion(
            signature!["to equal", anything()],
            Implementation::function(|values: &[Value]| {
                let equal = shape::satisfies(&values[0], &values[1]).is_ok()
                    && shape::satisfies(&values[1], &values[0]).is_ok();
                if equal {
                    Verdict::Pass
                } else {
                    mismatch(&values[0], &values[1])
                }
            }),
        )?,
        ordering("to be greater than", primitives::greater_than)?,
        ordering("to be less than", primitives::less_than)?,
        define_assertion(
            signature![
                number(),
                ["to be at least", "to be greater than or equal to"],
                number()
            ],
            Implementation::function(|values: &[Value]| {
                primitives::at_least(bound(&values[1]))
            }),
        )?,
        define_assertion(
            signature![
                number(),
                ["to be at most", "to be less than or equal to"],
                number()
            ],
            Implementation::function(|values: &[Value]| primitives::at_most(bound(&values[1]))),
        )?,
        define_assertion(
            signature![number(), "to be within", number(), number()],
            Implementation::function(|values: &[Value]| {
                let n = bound(&values[0]);
                bound(&values[1]) <= n && n <= bound(&values[2])
            }),
        )?,
    ])
}

fn ordering(
    phrase: &str,
    bounded: fn(f64) -> assay_validate::Validator,
) -> Result<AssertionDefinition, DefinitionError> {
    define_assertion(
        signature![number(), phrase, number()],
        Implementation::function(move |values: &[Value]| bounded(bound(&values[1]))),
    )
}

fn bound(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

fn same(actual: &Value, expected: &Value) -> Verdict {
    if actual == expected {
        Verdict::Pass
    } else {
        mismatch(actual, expected)
    }
}

fn mismatch(actual: &Value, expected: &Value) -> Verdict {
    Verdict::Mismatch {
        actual: actual.clone(),
        expected: expected.clone(),
    }
}
