//! The validation capability and its shared handles.
//!
//! A validator takes a raw value and either accepts it, returning the
//! (possibly coerced) value that downstream code should use instead, or
//! rejects it with an [`Invalid`] detail. Assertion slots hold validators
//! behind the cheap-to-clone [`Validator`] handle; asynchronous schema
//! bodies use the [`AsyncValidator`] twin.

use crate::invalid::Invalid;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Synchronous validation capability.
pub trait Validate: Send + Sync {
    /// Accept `value` (returning the value to use downstream) or reject it.
    fn validate(&self, value: &Value) -> Result<Value, Invalid>;

    /// Short type-like description used when rendering signatures, e.g.
    /// `number` or `string matching /^a/`.
    fn describe(&self) -> String;

    /// Whether this validator accepts every value without narrowing it.
    ///
    /// Matches that pass through such a validator are not exact.
    fn accepts_anything(&self) -> bool {
        false
    }
}

/// Asynchronous validation capability.
#[async_trait]
pub trait AsyncValidate: Send + Sync {
    async fn validate(&self, value: &Value) -> Result<Value, Invalid>;

    fn describe(&self) -> String;
}

/// Shared handle to a synchronous validator.
#[derive(Clone)]
pub struct Validator {
    inner: Arc<dyn Validate>,
}

impl Validator {
    pub fn new(validate: impl Validate + 'static) -> Self {
        Self {
            inner: Arc::new(validate),
        }
    }

    pub fn validate(&self, value: &Value) -> Result<Value, Invalid> {
        self.inner.validate(value)
    }

    pub fn describe(&self) -> String {
        self.inner.describe()
    }

    pub fn accepts_anything(&self) -> bool {
        self.inner.accepts_anything()
    }

    /// True when both handles point at the same validator instance.
    pub fn ptr_eq(&self, other: &Validator) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Validate for Validator {
    fn validate(&self, value: &Value) -> Result<Value, Invalid> {
        self.inner.validate(value)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn accepts_anything(&self) -> bool {
        self.inner.accepts_anything()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({})", self.describe())
    }
}

/// Shared handle to an asynchronous validator.
#[derive(Clone)]
pub struct AsyncValidator {
    inner: Arc<dyn AsyncValidate>,
}

impl AsyncValidator {
    pub fn new(validate: impl AsyncValidate + 'static) -> Self {
        Self {
            inner: Arc::new(validate),
        }
    }

    pub async fn validate(&self, value: &Value) -> Result<Value, Invalid> {
        self.inner.validate(value).await
    }

    pub fn describe(&self) -> String {
        self.inner.describe()
    }
}

impl fmt::Debug for AsyncValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AsyncValidator({})", self.describe())
    }
}

/// Every synchronous validator is trivially an asynchronous one.
#[async_trait]
impl AsyncValidate for Validator {
    async fn validate(&self, value: &Value) -> Result<Value, Invalid> {
        Validate::validate(self, value)
    }

    fn describe(&self) -> String {
        Validate::describe(self)
    }
}

impl From<Validator> for AsyncValidator {
    fn from(validator: Validator) -> Self {
        AsyncValidator::new(validator)
    }
}
