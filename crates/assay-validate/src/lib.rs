//! # assay-validate
//!
//! The value-validation capability that assay assertion slots are typed
//! with. A validator is opaque to the engine: given a raw JSON value it
//! either returns the value to use downstream (possibly coerced) or an
//! [`Invalid`] rejection.
//!
//! ```text
//! Validate / AsyncValidate   ← capability traits
//!     │
//! Validator / AsyncValidator ← shared handles stored in slots and bodies
//!     │
//! primitives                 ← string, number, array_of, pattern, date, …
//! ```

pub mod invalid;
pub mod primitives;
pub mod shape;
pub mod validator;

pub use invalid::{Invalid, type_name};
pub use validator::{AsyncValidate, AsyncValidator, Validate, Validator};
