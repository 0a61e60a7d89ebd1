//! Assertion definitions.
//!
//! An [`AssertionDefinition`] pairs a compiled slot list with an
//! [`Implementation`]. It is immutable once built and offers the two
//! operations the matcher needs: [`AssertionDefinition::try_match`] to test
//! a call shape, and `run` / `run_async` to execute the check on the values
//! a successful match produced.
//!
//! Implementations come in two flavours, fixed when the definition is built:
//!
//! - a *function* receiving the validated values (subject first, phrases
//!   omitted) and returning a [`Verdict`]
//! - a *schema*: a validator applied to the subject alone
//!
//! Each flavour has an asynchronous twin; those definitions can only be run
//! through the asynchronous entry point.

use crate::error::DefinitionError;
use crate::failure::{CallSite, Failure};
use crate::slot::{self, Fragment, Slot};
use assay_validate::{AsyncValidator, Validator};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Error type implementations may return.
///
/// Returning a boxed [`Failure`] reports a legitimate assertion outcome;
/// anything else is treated as a defect in the implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type CheckFn = Arc<dyn Fn(&[Value]) -> Result<Verdict, BoxError> + Send + Sync>;

pub type AsyncCheckFn =
    Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Verdict, BoxError>> + Send + Sync>;

/// What a function implementation concluded.
#[derive(Debug, Clone)]
pub enum Verdict {
    Pass,
    Fail,
    /// Failed, with explicit values for diff rendering.
    Mismatch { actual: Value, expected: Value },
    /// Apply this validator to the subject to decide.
    Validate(Validator),
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        if passed { Verdict::Pass } else { Verdict::Fail }
    }
}

impl From<()> for Verdict {
    fn from((): ()) -> Self {
        Verdict::Pass
    }
}

impl From<Validator> for Verdict {
    fn from(validator: Validator) -> Self {
        Verdict::Validate(validator)
    }
}

/// Anything a function implementation may return.
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<Verdict, BoxError>;
}

impl IntoOutcome for Verdict {
    fn into_outcome(self) -> Result<Verdict, BoxError> {
        Ok(self)
    }
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> Result<Verdict, BoxError> {
        Ok(self.into())
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<Verdict, BoxError> {
        Ok(Verdict::Pass)
    }
}

impl IntoOutcome for Validator {
    fn into_outcome(self) -> Result<Verdict, BoxError> {
        Ok(self.into())
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: Into<Verdict>,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<Verdict, BoxError> {
        self.map(Into::into).map_err(Into::into)
    }
}

/// The body of an assertion, tagged once at definition time.
#[derive(Clone)]
pub enum Implementation {
    Function(CheckFn),
    Schema(Validator),
    AsyncFunction(AsyncCheckFn),
    AsyncSchema(AsyncValidator),
}

impl Implementation {
    pub fn function<F, R>(check: F) -> Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        Implementation::Function(Arc::new(move |values: &[Value]| {
            check(values).into_outcome()
        }))
    }

    pub fn async_function<F, Fut, R>(check: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome + 'static,
    {
        Implementation::AsyncFunction(Arc::new(move |values: Vec<Value>| {
            check(values).map(IntoOutcome::into_outcome).boxed()
        }))
    }

    pub fn is_async(&self) -> bool {
        matches!(
            self,
            Implementation::AsyncFunction(_) | Implementation::AsyncSchema(_)
        )
    }

    /// The asynchronous twin of this implementation.
    pub fn to_async(&self) -> Implementation {
        match self {
            Implementation::Function(check) => {
                let check = check.clone();
                Implementation::AsyncFunction(Arc::new(move |values: Vec<Value>| {
                    let check = check.clone();
                    async move { check(&values) }.boxed()
                }))
            }
            Implementation::Schema(validator) => {
                Implementation::AsyncSchema(AsyncValidator::from(validator.clone()))
            }
            other => other.clone(),
        }
    }
}

impl From<Validator> for Implementation {
    fn from(validator: Validator) -> Self {
        Implementation::Schema(validator)
    }
}

impl From<AsyncValidator> for Implementation {
    fn from(validator: AsyncValidator) -> Self {
        Implementation::AsyncSchema(validator)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Implementation::Function(_) => f.write_str("Function"),
            Implementation::Schema(v) => write!(f, "Schema({})", v.describe()),
            Implementation::AsyncFunction(_) => f.write_str("AsyncFunction"),
            Implementation::AsyncSchema(v) => write!(f, "AsyncSchema({})", v.describe()),
        }
    }
}

/// A successful structural match.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Validated values of the non-phrase slots, subject first.
    pub values: Vec<Value>,
    /// False when any slot matched through an accept-anything validator.
    pub exact: bool,
}

/// Why a definition did not match a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Offending slot, or `None` when the argument count differs.
    pub slot: Option<usize>,
    pub reason: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(slot) => write!(f, "slot {slot}: {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

pub type MatchResult = Result<Match, Mismatch>;

/// An immutable assertion: slot signature plus implementation.
#[derive(Clone)]
pub struct AssertionDefinition {
    slots: Arc<[Slot]>,
    implementation: Implementation,
    signature: Arc<str>,
}

/// Define a synchronous assertion.
///
/// ```
/// use assay_kernel::{Implementation, define_assertion, signature};
/// use assay_validate::primitives::number;
///
/// let greater = define_assertion(
///     signature!["to be greater than", number()],
///     Implementation::function(|values| values[0].as_f64() > values[1].as_f64()),
/// )
/// .unwrap();
/// assert_eq!(greater.signature(), "<any> to be greater than <number>");
/// ```
pub fn define_assertion<I>(
    signature: I,
    implementation: impl Into<Implementation>,
) -> Result<AssertionDefinition, DefinitionError>
where
    I: IntoIterator,
    I::Item: Into<Fragment>,
{
    let definition = AssertionDefinition::new(slot::compile(signature)?, implementation.into());
    if definition.is_async() {
        return Err(DefinitionError::AsyncImplementation {
            signature: definition.signature().to_string(),
        });
    }
    Ok(definition)
}

/// Define an asynchronous assertion. Synchronous implementations are lifted.
pub fn define_async_assertion<I>(
    signature: I,
    implementation: impl Into<Implementation>,
) -> Result<AssertionDefinition, DefinitionError>
where
    I: IntoIterator,
    I::Item: Into<Fragment>,
{
    let implementation = implementation.into().to_async();
    Ok(AssertionDefinition::new(
        slot::compile(signature)?,
        implementation,
    ))
}

impl AssertionDefinition {
    fn new(slots: Vec<Slot>, implementation: Implementation) -> Self {
        let signature = slot::render(&slots);
        Self {
            slots: slots.into(),
            implementation,
            signature: signature.into(),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    pub fn is_async(&self) -> bool {
        self.implementation.is_async()
    }

    /// Rendered slot list, e.g. `<any> to be greater than <number>`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The phrase slots alone, e.g. `to be greater than`.
    pub fn phrase(&self) -> String {
        self.slots
            .iter()
            .filter(|slot| slot.is_phrase())
            .map(Slot::to_string)
            .collect::<Vec<_>>()
            .join(" … ")
    }

    /// The same definition with its implementation lifted to async.
    pub fn to_async(&self) -> AssertionDefinition {
        Self {
            slots: self.slots.clone(),
            implementation: self.implementation.to_async(),
            signature: self.signature.clone(),
        }
    }

    /// Match raw call arguments against the slot list.
    pub fn try_match(&self, raw: &[Value]) -> MatchResult {
        if raw.len() != self.slots.len() {
            return Err(Mismatch {
                slot: None,
                reason: format!(
                    "expected {} arguments, got {}",
                    self.slots.len(),
                    raw.len()
                ),
            });
        }

        let mut values = Vec::with_capacity(raw.len());
        let mut exact = true;
        for (index, (slot, arg)) in self.slots.iter().zip(raw).enumerate() {
            match slot {
                Slot::Literal(text) => {
                    if arg.as_str() != Some(text.as_str()) {
                        return Err(Mismatch {
                            slot: Some(index),
                            reason: format!("expected {text:?}, got {arg}"),
                        });
                    }
                }
                Slot::Choice(options) => {
                    let given = slot::coerce_to_string(arg);
                    if !options.contains(&given) {
                        return Err(Mismatch {
                            slot: Some(index),
                            reason: format!("expected one of {slot}, got {arg}"),
                        });
                    }
                }
                Slot::Param(validator) if validator.accepts_anything() => {
                    exact = false;
                    values.push(arg.clone());
                }
                Slot::Param(validator) => match validator.validate(arg) {
                    Ok(value) => values.push(value),
                    Err(invalid) => {
                        return Err(Mismatch {
                            slot: Some(index),
                            reason: invalid.to_string(),
                        });
                    }
                },
            }
        }
        Ok(Match { values, exact })
    }

    /// Execute a synchronous implementation on matched values.
    pub fn run(&self, values: &[Value], raw: &[Value], site: &CallSite) -> Result<(), Failure> {
        let subject = values.first().cloned().unwrap_or(Value::Null);
        match &self.implementation {
            Implementation::Function(check) => {
                let outcome = catch_unwind(AssertUnwindSafe(|| check(values)));
                self.interpret(outcome, &subject, raw, site)
            }
            Implementation::Schema(validator) => validator
                .validate(&subject)
                .map(drop)
                .map_err(|invalid| site.invalid(&self.slots, raw, invalid)),
            Implementation::AsyncFunction(_) | Implementation::AsyncSchema(_) => Err(site
                .usage(format!(
                    "asynchronous assertion `{}` cannot run from the synchronous entry point",
                    self.signature
                ))
                .with_args(raw.to_vec())),
        }
    }

    /// Execute any implementation on matched values.
    pub async fn run_async(
        &self,
        values: Vec<Value>,
        raw: &[Value],
        site: &CallSite,
    ) -> Result<(), Failure> {
        match &self.implementation {
            Implementation::AsyncFunction(check) => {
                let subject = values.first().cloned().unwrap_or(Value::Null);
                let outcome = match catch_unwind(AssertUnwindSafe(|| check(values))) {
                    Ok(pending) => AssertUnwindSafe(pending).catch_unwind().await,
                    Err(panic) => Err(panic),
                };
                self.interpret(outcome, &subject, raw, site)
            }
            Implementation::AsyncSchema(validator) => {
                let subject = values.first().cloned().unwrap_or(Value::Null);
                validator
                    .validate(&subject)
                    .await
                    .map(drop)
                    .map_err(|invalid| site.invalid(&self.slots, raw, invalid))
            }
            Implementation::Function(_) | Implementation::Schema(_) => {
                self.run(&values, raw, site)
            }
        }
    }

    fn interpret(
        &self,
        outcome: Result<Result<Verdict, BoxError>, Box<dyn Any + Send>>,
        subject: &Value,
        raw: &[Value],
        site: &CallSite,
    ) -> Result<(), Failure> {
        let verdict = match outcome {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(error)) => {
                return Err(match error.downcast::<Failure>() {
                    Ok(failure) => (*failure).with_origin(site.origin),
                    Err(other) => {
                        site.implementation_error(&self.signature, raw, other.to_string())
                    }
                });
            }
            Err(panic) => {
                return Err(site.implementation_error(
                    &self.signature,
                    raw,
                    format!("panicked: {}", panic_message(panic.as_ref())),
                ));
            }
        };

        match verdict {
            Verdict::Pass => Ok(()),
            Verdict::Fail => Err(site.assertion_failed(&self.slots, raw)),
            Verdict::Mismatch { actual, expected } => {
                Err(site.mismatch(&self.slots, raw, actual, expected))
            }
            Verdict::Validate(validator) => validator
                .validate(subject)
                .map(drop)
                .map_err(|invalid| site.invalid(&self.slots, raw, invalid)),
        }
    }
}

impl fmt::Debug for AssertionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionDefinition")
            .field("signature", &self.signature)
            .field("implementation", &self.implementation)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
