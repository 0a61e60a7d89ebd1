//! Instants. Subjects and parameters go through the `date` validator, so
//! RFC 3339 strings and epoch milliseconds mix freely.

use assay_kernel::{
    AssertionDefinition, DefinitionError, Implementation, define_assertion, signature,
};
use assay_validate::primitives::date;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;

pub fn definitions() -> Result<Vec<AssertionDefinition>, DefinitionError> {
    Ok(vec![
        compare(["to be before", "to be earlier than"], Ordering::Less)?,
        compare(["to be after", "to be later than"], Ordering::Greater)?,
        compare(["to be the same instant as", "to be simultaneous with"], Ordering::Equal)?,
    ])
}

fn compare(phrases: [&str; 2], wanted: Ordering) -> Result<AssertionDefinition, DefinitionError> {
    define_assertion(
        signature![date(), phrases, date()],
        Implementation::function(move |values: &[Value]| {
            match (instant(&values[0]), instant(&values[1])) {
                (Some(left), Some(right)) => left.cmp(&right) == wanted,
                _ => false,
            }
        }),
    )
}

/// Validated dates are normalised RFC 3339 strings.
fn instant(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
