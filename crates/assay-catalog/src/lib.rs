//! # Assay Catalog
//!
//! A standard set of assertions for the assay kernel. Nothing here is
//! special to the engine: every entry is an ordinary
//! [`AssertionDefinition`], and callers extend the resulting checker with
//! their own the same way.
//!
//! ```
//! use assay_kernel::check;
//!
//! let checker = assay_catalog::checker().unwrap();
//! assert!(check!(checker, 5, "to be greater than", 3).is_ok());
//! assert!(check!(checker, "assay", "to be a", "string", "and", "to have length", 5).is_ok());
//! ```

pub mod collections;
pub mod compare;
pub mod dates;
pub mod text;
pub mod types;

use assay_kernel::{AssertionDefinition, Checker, DefinitionError};

/// Every synchronous catalog definition, in registration order.
pub fn standard() -> Result<Vec<AssertionDefinition>, DefinitionError> {
    let mut definitions = compare::definitions()?;
    definitions.extend(types::definitions()?);
    definitions.extend(collections::definitions()?);
    definitions.extend(text::definitions()?);
    definitions.extend(dates::definitions()?);
    Ok(definitions)
}

/// The same catalog lifted for the asynchronous entry point.
pub fn standard_async() -> Result<Vec<AssertionDefinition>, DefinitionError> {
    Ok(standard()?.iter().map(AssertionDefinition::to_async).collect())
}

/// A checker recognising the whole catalog from both entry points.
pub fn checker() -> Result<Checker, DefinitionError> {
    Ok(Checker::empty().extend(standard()?.into_iter().chain(standard_async()?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_kernel::{FailureKind, Mode, check};

    #[test]
    fn both_halves_carry_the_catalog() {
        let checker = checker().unwrap();
        let registry = checker.registry();
        assert_eq!(
            registry.definitions(Mode::Sync).len(),
            registry.definitions(Mode::Async).len()
        );
        assert!(registry.definitions(Mode::Async).iter().all(|d| d.is_async()));
    }

    #[test]
    fn signatures_are_distinct() {
        let definitions = standard().unwrap();
        let mut signatures: Vec<&str> = definitions.iter().map(|d| d.signature()).collect();
        let total = signatures.len();
        signatures.sort_unstable();
        signatures.dedup();
        assert_eq!(signatures.len(), total);
    }

    #[test]
    fn later_conjuncts_cannot_take_a_phrase_as_subject() {
        let checker = checker().unwrap();
        let failure =
            check!(checker, 5, "to be a", "number", "and", "to be empty", "to be truthy")
                .unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnknownCall);
        assert!(check!(checker, 5, "to be a", "number", "and", "to be truthy").is_ok());
    }
}
