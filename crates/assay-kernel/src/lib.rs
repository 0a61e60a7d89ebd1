//! # Assay Kernel
//!
//! An extensible assertion engine. Callers hand one entry point a subject,
//! a phrase, and optional parameters:
//!
//! ```
//! use assay_kernel::{Checker, Implementation, check, define_assertion, signature};
//! use assay_validate::primitives::number;
//!
//! let checker = Checker::empty().extend([define_assertion(
//!     signature!["to be greater than", number()],
//!     Implementation::function(|values| values[0].as_f64() > values[1].as_f64()),
//! )
//! .unwrap()]);
//!
//! assert!(check!(checker, 5, "to be greater than", 3).is_ok());
//! assert!(check!(checker, 3, "not to be greater than", 3).is_ok());
//! assert!(check!(checker, 5, "to be greater than", 3, "and", "to be greater than", 4).is_ok());
//! ```
//!
//! The kernel does not decide which assertions exist. It only prescribes
//! how they are declared, matched and executed, and how their outcomes are
//! reported.
//!
//! ## Architecture
//!
//! ```text
//! Fragment / Slot       ← signature elements and their compiled form
//!     │
//! AssertionDefinition   ← slots + implementation; try_match / run
//!     │
//! Registry              ← ordered, copy-on-extend; sync and async halves
//!     │
//! matcher               ← conjunction, negation, scan, tie-break
//!     │
//! Checker               ← check / check_async / fail / extend
//!     │
//! Failure               ← the one structured outcome of a failed check
//! ```

pub mod call;
pub mod checker;
pub mod config;
pub mod definition;
pub mod error;
pub mod failure;
pub mod matcher;
pub mod registry;
pub mod slot;

pub use checker::Checker;
pub use config::{CheckerConfig, DiagnosticsConfig};
pub use definition::{
    AssertionDefinition, BoxError, Implementation, IntoOutcome, Match, Mismatch, Verdict,
    define_assertion, define_async_assertion,
};
pub use error::{ConfigError, DefinitionError};
pub use failure::{CallSite, Failure, FailureKind, Rejection};
pub use registry::{Mode, Registry};
pub use slot::{Fragment, Slot};

use serde_json::Value;

/// Turn a JSON array into call arguments. Any other value is a one-element
/// call.
pub fn call_args(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Build a signature from mixed phrases, choices and validators.
///
/// ```
/// use assay_kernel::signature;
/// use assay_validate::primitives::string;
///
/// let fragments = signature![string(), ["to start with", "to begin with"], string()];
/// assert_eq!(fragments.len(), 3);
/// ```
#[macro_export]
macro_rules! signature {
    ($($fragment:expr),+ $(,)?) => {
        [$($crate::Fragment::from($fragment)),+]
    };
}

/// `check!(checker, subject, "phrase", params...)` with JSON-literal
/// arguments.
#[macro_export]
macro_rules! check {
    ($checker:expr, $($args:tt)+) => {
        $checker.check($crate::call_args($crate::__private::json!([$($args)+])))
    };
}

/// Asynchronous twin of [`check!`]; evaluates to a future.
#[macro_export]
macro_rules! check_async {
    ($checker:expr, $($args:tt)+) => {
        $checker.check_async($crate::call_args($crate::__private::json!([$($args)+])))
    };
}

#[doc(hidden)]
pub mod __private {
    pub use serde_json::json;
}
