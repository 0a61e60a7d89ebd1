//! Regex and affix checks on strings.

use assay_kernel::{
    AssertionDefinition, BoxError, DefinitionError, Implementation, Verdict, define_assertion,
    signature,
};
use assay_validate::primitives::{self, string};
use serde_json::Value;

pub fn definitions() -> Result<Vec<AssertionDefinition>, DefinitionError> {
    Ok(vec![
        // An unparsable pattern is a bug in the call, not a failed check.
        define_assertion(
            signature![string(), "to match", string()],
            Implementation::function(|values: &[Value]| -> Result<Verdict, BoxError> {
                let source = values[1].as_str().unwrap_or_default();
                Ok(primitives::pattern_str(source)?.into())
            }),
        )?,
        affix(["to start with", "to begin with"], |text, prefix| text.starts_with(prefix))?,
        affix(["to end with", "to finish with"], |text, suffix| text.ends_with(suffix))?,
    ])
}

fn affix(
    phrases: [&str; 2],
    holds: fn(&str, &str) -> bool,
) -> Result<AssertionDefinition, DefinitionError> {
    define_assertion(
        signature![string(), phrases, string()],
        Implementation::function(move |values: &[Value]| {
            match (values[0].as_str(), values[1].as_str()) {
                (Some(text), Some(affix)) => holds(text, affix),
                _ => false,
            }
        }),
    )
}
