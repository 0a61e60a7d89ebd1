//! Structured failures.
//!
//! Every unsuccessful check ends in exactly one [`Failure`], classified by
//! [`FailureKind`]:
//!
//! - `unknown_call`: no definition recognised the call shape
//! - `assertion_failed`: a definition matched and its check said no
//! - `negation_violated`: a negated call's underlying assertion passed
//! - `implementation_error`: an implementation errored or panicked with
//!   something other than a [`Failure`]
//! - `ambiguous_match`: two definitions matched the same call exactly
//! - `usage`: the engine was driven incorrectly (async body run synchronously)
//!
//! Only the first two "assertion" kinds mean a check legitimately failed.
//! A [`CallSite`] builds the failures so that all of them carry the same
//! rendering of the call and the caller's source location.

use crate::slot::{Slot, coerce_to_string};
use assay_validate::Invalid;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::panic::Location;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnknownCall,
    AssertionFailed,
    NegationViolated,
    ImplementationError,
    AmbiguousMatch,
    Usage,
}

impl FailureKind {
    /// Whether this kind reports a legitimately failed check rather than a
    /// defect in the call, the registry, or an implementation.
    pub fn is_assertion(self) -> bool {
        matches!(
            self,
            FailureKind::AssertionFailed | FailureKind::NegationViolated
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::UnknownCall => "unknown_call",
            FailureKind::AssertionFailed => "assertion_failed",
            FailureKind::NegationViolated => "negation_violated",
            FailureKind::ImplementationError => "implementation_error",
            FailureKind::AmbiguousMatch => "ambiguous_match",
            FailureKind::Usage => "usage",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why one definition did not recognise a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    /// Rendered signature of the rejecting definition.
    pub definition: String,

    /// Offending slot, or `None` for an argument-count mismatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,

    pub reason: String,
}

/// The structured failure produced by every check.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,

    /// Raw arguments of the (conjunct of the) call that failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,

    /// Per-definition rejection reasons (unknown calls only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<Rejection>,

    /// Rendered underlying error for implementation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,

    /// `file:line:column` of the check call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            actual: None,
            expected: None,
            args: Vec::new(),
            rejections: Vec::new(),
            cause: None,
            origin: None,
        }
    }

    pub fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_rejections(mut self, rejections: Vec<Rejection>) -> Self {
        self.rejections = rejections;
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Record the call site, keeping an origin that is already set.
    pub fn with_origin(mut self, origin: Option<&'static Location<'static>>) -> Self {
        if self.origin.is_none() {
            self.origin = origin.map(|at| at.to_string());
        }
        self
    }

    /// True for `assertion_failed` and `negation_violated`.
    pub fn is_assertion(&self) -> bool {
        self.kind.is_assertion()
    }
}

/// Where a check was invoked from, plus the rendering limits for its
/// messages. Built once per call and handed to every definition it runs.
#[derive(Debug, Clone, Copy)]
pub struct CallSite {
    pub origin: Option<&'static Location<'static>>,
    pub max_value_width: usize,
}

impl Default for CallSite {
    fn default() -> Self {
        Self {
            origin: None,
            max_value_width: 120,
        }
    }
}

impl CallSite {
    pub fn new(origin: &'static Location<'static>, max_value_width: usize) -> Self {
        Self {
            origin: Some(origin),
            max_value_width,
        }
    }

    /// Render a value as compact JSON, truncated to the width limit.
    pub fn render_value(&self, value: &Value) -> String {
        truncate(&value.to_string(), self.max_value_width)
    }

    /// Render a matched call: phrase positions verbatim, values as JSON.
    ///
    /// `expected 2 to be greater than 3`
    pub fn describe_call(&self, slots: &[Slot], raw: &[Value]) -> String {
        let mut parts = Vec::with_capacity(raw.len() + 1);
        parts.push("expected".to_string());
        for (index, arg) in raw.iter().enumerate() {
            if slots.get(index).is_some_and(Slot::is_phrase) {
                parts.push(coerce_to_string(arg));
            } else {
                parts.push(self.render_value(arg));
            }
        }
        parts.join(" ")
    }

    /// Render a call nothing recognised.
    pub fn describe_args(&self, raw: &[Value]) -> String {
        let rendered = raw
            .iter()
            .map(|arg| self.render_value(arg))
            .collect::<Vec<_>>()
            .join(", ");
        format!("({rendered})")
    }

    pub fn unknown_call(
        &self,
        raw: &[Value],
        rejections: Vec<Rejection>,
        suggestions: &[String],
    ) -> Failure {
        let mut message = format!("no assertion matches {}", self.describe_args(raw));
        if !suggestions.is_empty() {
            message.push_str(&format!(
                "; known phrases for {} arguments: {}",
                raw.len(),
                suggestions.join(", ")
            ));
        }
        Failure::new(FailureKind::UnknownCall, message)
            .with_args(raw.to_vec())
            .with_rejections(rejections)
            .with_origin(self.origin)
    }

    /// A predicate returned false.
    pub fn assertion_failed(&self, slots: &[Slot], raw: &[Value]) -> Failure {
        let mut failure = Failure::new(FailureKind::AssertionFailed, self.describe_call(slots, raw))
            .with_args(raw.to_vec())
            .with_origin(self.origin);
        if let Some(subject) = raw.first() {
            failure = failure.with_actual(subject.clone());
        }
        failure
    }

    /// A predicate reported explicit actual/expected values.
    pub fn mismatch(
        &self,
        slots: &[Slot],
        raw: &[Value],
        actual: Value,
        expected: Value,
    ) -> Failure {
        Failure::new(FailureKind::AssertionFailed, self.describe_call(slots, raw))
            .with_actual(actual)
            .with_expected(expected)
            .with_args(raw.to_vec())
            .with_origin(self.origin)
    }

    /// A schema body or a validator returned by a predicate rejected the
    /// subject.
    pub fn invalid(&self, slots: &[Slot], raw: &[Value], invalid: Invalid) -> Failure {
        let message = format!("{}: {invalid}", self.describe_call(slots, raw));
        let actual = invalid.actual.or_else(|| raw.first().cloned());
        let mut failure = Failure::new(FailureKind::AssertionFailed, message)
            .with_args(raw.to_vec())
            .with_origin(self.origin);
        if let Some(actual) = actual {
            failure = failure.with_actual(actual);
        }
        if let Some(expected) = invalid.expected {
            failure = failure.with_expected(expected);
        }
        failure
    }

    pub fn negation_violated(&self, slots: &[Slot], raw: &[Value]) -> Failure {
        let message = format!("{}, but the assertion passed", self.describe_call(slots, raw));
        let mut failure = Failure::new(FailureKind::NegationViolated, message)
            .with_args(raw.to_vec())
            .with_origin(self.origin);
        if let Some(subject) = raw.first() {
            failure = failure.with_actual(subject.clone());
        }
        failure
    }

    pub fn implementation_error(&self, signature: &str, raw: &[Value], cause: String) -> Failure {
        Failure::new(
            FailureKind::ImplementationError,
            format!(
                "implementation of `{signature}` failed on {}: {cause}",
                self.describe_args(raw)
            ),
        )
        .with_args(raw.to_vec())
        .with_cause(cause)
        .with_origin(self.origin)
    }

    pub fn ambiguous(&self, raw: &[Value], first: &str, second: &str) -> Failure {
        Failure::new(
            FailureKind::AmbiguousMatch,
            format!(
                "ambiguous assertion {}: matched both `{first}` and `{second}`",
                self.describe_args(raw)
            ),
        )
        .with_args(raw.to_vec())
        .with_origin(self.origin)
    }

    pub fn usage(&self, message: impl Into<String>) -> Failure {
        Failure::new(FailureKind::Usage, message).with_origin(self.origin)
    }

    /// Unconditional failure requested by the caller.
    pub fn explicit(&self, reason: Option<&str>) -> Failure {
        Failure::new(
            FailureKind::AssertionFailed,
            reason.unwrap_or("explicitly failed"),
        )
        .with_origin(self.origin)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_validate::primitives;
    use serde_json::json;

    fn greater_than_slots() -> Vec<Slot> {
        vec![
            Slot::Param(primitives::anything()),
            Slot::Literal("to be greater than".to_string()),
            Slot::Param(primitives::number()),
        ]
    }

    #[test]
    fn describes_matched_call() {
        let site = CallSite::default();
        let raw = vec![json!(2), json!("to be greater than"), json!(3)];
        insta::assert_snapshot!(
            site.describe_call(&greater_than_slots(), &raw),
            @"expected 2 to be greater than 3"
        );
    }

    #[test]
    fn describes_negated_phrase_verbatim() {
        let site = CallSite::default();
        let raw = vec![json!(5), json!("not to be greater than"), json!(3)];
        let failure = site.negation_violated(&greater_than_slots(), &raw);
        assert_eq!(failure.kind, FailureKind::NegationViolated);
        insta::assert_snapshot!(
            failure.message,
            @"expected 5 not to be greater than 3, but the assertion passed"
        );
        assert_eq!(failure.actual, Some(json!(5)));
    }

    #[test]
    fn truncates_long_values() {
        let site = CallSite {
            origin: None,
            max_value_width: 6,
        };
        assert_eq!(site.render_value(&json!("abcdefgh")), "\"abcd…");
        assert_eq!(site.render_value(&json!(1)), "1");
    }

    #[test]
    fn unknown_call_lists_suggestions() {
        let site = CallSite::default();
        let raw = vec![json!(42), json!("to be a"), json!("boognish")];
        let failure = site.unknown_call(&raw, Vec::new(), &["to equal".to_string()]);
        assert_eq!(failure.kind, FailureKind::UnknownCall);
        insta::assert_snapshot!(
            failure.message,
            @r#"no assertion matches (42, "to be a", "boognish"); known phrases for 3 arguments: to equal"#
        );
        assert_eq!(failure.args, raw);
    }

    #[test]
    fn invalid_carries_expected_and_actual() {
        let site = CallSite::default();
        let raw = vec![json!(2), json!("to be greater than"), json!(3)];
        let invalid = Invalid::new("expected number greater than 3, got 2")
            .with_expected(json!("number greater than 3"))
            .with_actual(json!(2));
        let failure = site.invalid(&greater_than_slots(), &raw, invalid);
        assert_eq!(failure.kind, FailureKind::AssertionFailed);
        assert_eq!(failure.actual, Some(json!(2)));
        assert_eq!(failure.expected, Some(json!("number greater than 3")));
        insta::assert_snapshot!(
            failure.message,
            @"expected 2 to be greater than 3: expected number greater than 3, got 2"
        );
    }

    #[test]
    fn origin_is_kept_once_set() {
        let first = Location::caller();
        let failure = Failure::new(FailureKind::Usage, "x").with_origin(Some(first));
        let origin = failure.origin.clone();
        assert!(origin.is_some());
        let failure = failure.with_origin(None);
        assert_eq!(failure.origin, origin);
    }

    #[test]
    fn serializes_as_witness() {
        let failure = Failure::new(FailureKind::AssertionFailed, "nope").with_actual(json!(1));
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            json,
            json!({"kind": "assertion_failed", "message": "nope", "actual": 1})
        );
    }

    #[test]
    fn only_assertion_kinds_are_assertions() {
        assert!(FailureKind::AssertionFailed.is_assertion());
        assert!(FailureKind::NegationViolated.is_assertion());
        assert!(!FailureKind::UnknownCall.is_assertion());
        assert!(!FailureKind::ImplementationError.is_assertion());
        assert!(!FailureKind::AmbiguousMatch.is_assertion());
        assert!(!FailureKind::Usage.is_assertion());
    }
}
