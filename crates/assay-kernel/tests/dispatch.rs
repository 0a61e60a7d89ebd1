//! Integration tests: the entry points driven end to end.
//!
//! Definitions are declared locally so the engine is exercised without any
//! standard catalog.

use assay_kernel::{
    BoxError, Checker, Failure, FailureKind, Fragment, Implementation, Verdict, check, check_async,
    define_assertion, define_async_assertion, signature,
};
use assay_validate::{Invalid, primitives};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn ordering() -> Checker {
    Checker::empty().extend([
        define_assertion(
            signature!["to be greater than", primitives::number()],
            Implementation::function(|values: &[Value]| {
                primitives::greater_than(values[1].as_f64().unwrap_or_default())
            }),
        )
        .unwrap(),
        define_assertion(
            signature!["to be less than", primitives::number()],
            Implementation::function(|values: &[Value]| {
                primitives::less_than(values[1].as_f64().unwrap_or_default())
            }),
        )
        .unwrap(),
        define_assertion(
            signature![primitives::string(), "to be empty"],
            Implementation::function(|values: &[Value]| values[0] == json!("")),
        )
        .unwrap(),
        define_assertion(
            ["to explode"],
            Implementation::function(|_: &[Value]| -> Result<bool, BoxError> {
                Err("wires crossed".into())
            }),
        )
        .unwrap(),
    ])
}

#[test]
fn passing_and_failing_checks() {
    let checker = ordering();
    assert!(check!(checker, 5, "to be greater than", 3).is_ok());

    let failure = check!(checker, 2, "to be greater than", 3).unwrap_err();
    assert_eq!(failure.kind, FailureKind::AssertionFailed);
    assert_eq!(failure.actual, Some(json!(2)));
    assert_eq!(failure.expected, Some(json!("number greater than 3")));
    insta::assert_snapshot!(
        failure.message,
        @"expected 2 to be greater than 3: expected number greater than 3, got 2"
    );
}

#[test]
fn failures_point_at_the_caller() {
    let failure = check!(ordering(), 2, "to be greater than", 3).unwrap_err();
    let origin = failure.origin.unwrap_or_default();
    assert!(origin.contains("dispatch.rs"), "origin was {origin}");
}

#[test]
fn negation_inverts_validity() {
    let checker = ordering();
    for (subject, bound) in [(5, 3), (3, 3), (2, 3)] {
        let plain = check!(checker, subject, "to be greater than", bound);
        let negated = check!(checker, subject, "not to be greater than", bound);
        match plain {
            Ok(()) => {
                let failure = negated.unwrap_err();
                assert_eq!(failure.kind, FailureKind::NegationViolated);
            }
            Err(failure) => {
                assert_eq!(failure.kind, FailureKind::AssertionFailed);
                assert!(negated.is_ok());
            }
        }
    }
}

#[test]
fn negation_does_not_hide_implementation_errors() {
    let failure = check!(ordering(), 1, "not to explode").unwrap_err();
    assert_eq!(failure.kind, FailureKind::ImplementationError);
    assert_eq!(failure.cause.as_deref(), Some("wires crossed"));
    assert!(!failure.is_assertion());
}

#[test]
fn negation_does_not_hide_unknown_calls() {
    let failure = check!(ordering(), 1, "not to be purple").unwrap_err();
    assert_eq!(failure.kind, FailureKind::UnknownCall);
    assert_eq!(failure.args, vec![json!(1), json!("not to be purple")]);
}

#[test]
fn conjunction_runs_every_group() {
    let checker = ordering();
    assert!(check!(checker, 5, "to be greater than", 3, "and", "to be less than", 9).is_ok());

    let failure =
        check!(checker, 10, "to be greater than", 3, "and", "to be less than", 9).unwrap_err();
    assert_eq!(failure.args, vec![json!(10), json!("to be less than"), json!(9)]);
}

#[test]
fn conjunction_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let checker = ordering().extend([define_assertion(
        ["to be counted"],
        Implementation::function(move |_: &[Value]| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        }),
    )
    .unwrap()]);

    let failure = check!(checker, 1, "to be greater than", 3, "and", "to be counted").unwrap_err();
    assert_eq!(failure.kind, FailureKind::AssertionFailed);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(check!(checker, 4, "to be greater than", 3, "and", "to be counted").is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn negation_applies_per_conjunct() {
    let checker = ordering();
    assert!(check!(checker, 5, "to be greater than", 3, "and", "not to be less than", 4).is_ok());
    let failure =
        check!(checker, 5, "not to be greater than", 3, "and", "to be less than", 9).unwrap_err();
    assert_eq!(failure.kind, FailureKind::NegationViolated);
}

#[test]
fn exact_definition_wins_over_earlier_loose_one() {
    let checker = Checker::empty().extend([
        define_assertion(["to be empty"], Implementation::function(|_: &[Value]| false)).unwrap(),
        define_assertion(
            signature![primitives::string(), "to be empty"],
            Implementation::function(|values: &[Value]| values[0] == json!("")),
        )
        .unwrap(),
    ]);
    assert!(check!(checker, "", "to be empty").is_ok());
    // Non-strings only match the loose definition.
    assert!(check!(checker, [], "to be empty").is_err());
}

#[test]
fn colliding_exact_definitions_are_ambiguous() {
    let checker = ordering().extend([define_assertion(
        signature![primitives::string(), "to be empty"],
        Implementation::function(|_: &[Value]| true),
    )
    .unwrap()]);
    let failure = check!(checker, "", "to be empty").unwrap_err();
    assert_eq!(failure.kind, FailureKind::AmbiguousMatch);
    insta::assert_snapshot!(
        failure.message,
        @r#"ambiguous assertion ("", "to be empty"): matched both `<string> to be empty` and `<string> to be empty`"#
    );
}

#[test]
fn unknown_calls_list_rejections_and_suggestions() {
    let failure = check!(ordering(), 42, "to be a", "boognish").unwrap_err();
    assert_eq!(failure.kind, FailureKind::UnknownCall);
    insta::assert_snapshot!(
        failure.message,
        @r#"no assertion matches (42, "to be a", "boognish"); known phrases for 3 arguments: to be greater than, to be less than"#
    );
    let reasons: Vec<String> = failure
        .rejections
        .iter()
        .map(|r| format!("{}: {}", r.definition, r.reason))
        .collect();
    insta::assert_snapshot!(reasons.join("\n"), @r#"
    <any> to be greater than <number>: expected "to be greater than", got "to be a"
    <any> to be less than <number>: expected "to be less than", got "to be a"
    <string> to be empty: expected 2 arguments, got 3
    <any> to explode: expected 2 arguments, got 3
    "#);
}

#[test]
fn extension_does_not_touch_the_original() {
    let foo = define_assertion(
        ["to be a Foo"],
        primitives::predicate("Foo", |v| v["$class"] == json!("Foo")),
    )
    .unwrap();
    let base = ordering();
    let extended = base.extend([foo]);

    assert!(check!(extended, {"$class": "Foo"}, "to be a Foo").is_ok());
    assert!(check!(extended, 5, "to be greater than", 3).is_ok());
    let failure = check!(base, {"$class": "Foo"}, "to be a Foo").unwrap_err();
    assert_eq!(failure.kind, FailureKind::UnknownCall);
}

#[test]
fn nested_failures_keep_their_kind() {
    let inner = ordering();
    let checker = ordering().extend([define_assertion(
        signature!["to be between", primitives::number(), primitives::number()],
        Implementation::function(move |values: &[Value]| -> Result<(), Failure> {
            inner.check(vec![values[0].clone(), json!("to be greater than"), values[1].clone()])?;
            inner.check(vec![values[0].clone(), json!("to be less than"), values[2].clone()])
        }),
    )
    .unwrap()]);

    assert!(check!(checker, 5, "to be between", 1, 9).is_ok());
    let failure = check!(checker, 0, "to be between", 1, 9).unwrap_err();
    assert_eq!(failure.kind, FailureKind::AssertionFailed);
    // Origin is where the nested check was made.
    assert!(failure.origin.unwrap_or_default().contains("dispatch.rs"));
    assert!(check!(checker, 0, "not to be between", 1, 9).is_ok());
}

#[test]
fn schema_bodies_report_validator_detail() {
    let checker = Checker::empty().extend([define_assertion(
        ["to be a list of numbers"],
        primitives::array_of(primitives::number()),
    )
    .unwrap()]);
    let failure = check!(checker, [1, "two"], "to be a list of numbers").unwrap_err();
    insta::assert_snapshot!(
        failure.message,
        @r#"expected [1,"two"] to be a list of numbers: at 1: expected number, got string"#
    );
}

#[test]
fn mismatch_verdicts_carry_diff_values() {
    let checker = Checker::empty().extend([define_assertion(
        signature!["to equal", primitives::anything()],
        Implementation::function(|values: &[Value]| {
            if values[0] == values[1] {
                Verdict::Pass
            } else {
                Verdict::Mismatch {
                    actual: values[0].clone(),
                    expected: values[1].clone(),
                }
            }
        }),
    )
    .unwrap()]);
    let failure = check!(checker, {"a": 1}, "to equal", {"a": 2}).unwrap_err();
    assert_eq!(failure.actual, Some(json!({"a": 1})));
    assert_eq!(failure.expected, Some(json!({"a": 2})));
}

#[test]
fn choice_phrases_match_any_alternative() {
    let checker = Checker::empty().extend([define_assertion(
        [
            Fragment::from(primitives::string()),
            ["to start with", "to begin with"].into(),
            primitives::string().into(),
        ],
        Implementation::function(|values: &[Value]| {
            match (values[0].as_str(), values[1].as_str()) {
                (Some(text), Some(prefix)) => text.starts_with(prefix),
                _ => false,
            }
        }),
    )
    .unwrap()]);
    assert!(check!(checker, "assay", "to start with", "as").is_ok());
    assert!(check!(checker, "assay", "to begin with", "as").is_ok());
    assert!(check!(checker, "assay", "not to begin with", "ay").is_ok());
    assert!(check!(checker, "assay", "to open with", "as").is_err());
}

#[test]
fn long_values_are_truncated_in_messages() {
    let config = assay_kernel::CheckerConfig::from_toml_str(
        "[diagnostics]\nmax_value_width = 8\n",
    )
    .unwrap();
    let checker = ordering().with_config(config);
    let failure = check!(checker, "a very long subject", "to be empty", "x").unwrap_err();
    assert!(failure.message.starts_with(r#"no assertion matches ("a very…"#));
}

#[test]
fn rejections_are_capped_only_on_request() {
    let checker = Checker::empty().extend((0..40).map(|n| {
        define_assertion([format!("to be case {n}")], Implementation::function(|_: &[Value]| true))
            .unwrap()
    }));
    let failure = check!(checker, 1, "to be case forty").unwrap_err();
    assert_eq!(failure.rejections.len(), 40);

    let config = assay_kernel::CheckerConfig::from_toml_str("[diagnostics]\nmax_rejections = 3\n")
        .unwrap();
    let failure = check!(checker.with_config(config), 1, "to be case forty").unwrap_err();
    assert_eq!(failure.kind, FailureKind::UnknownCall);
    assert_eq!(failure.rejections.len(), 3);
}

#[test]
fn async_definitions_are_not_visible_synchronously() {
    let checker = ordering().extend([define_async_assertion(
        ["to arrive"],
        Implementation::async_function(|_: Vec<Value>| async { true }),
    )
    .unwrap()]);
    let failure = check!(checker, 1, "to arrive").unwrap_err();
    assert_eq!(failure.kind, FailureKind::UnknownCall);
}

#[tokio::test]
async fn async_entry_point_runs_async_definitions() {
    let checker = Checker::empty().extend([
        define_async_assertion(
            signature!["to resolve to", primitives::anything()],
            Implementation::async_function(|values: Vec<Value>| async move {
                tokio::task::yield_now().await;
                values[0] == values[1]
            }),
        )
        .unwrap(),
        define_async_assertion(
            ["to be a number"],
            Implementation::Schema(primitives::number()),
        )
        .unwrap(),
    ]);

    assert!(check_async!(checker, 1, "to resolve to", 1).await.is_ok());
    assert!(check_async!(checker, 1, "not to resolve to", 2).await.is_ok());
    assert!(check_async!(checker, 1, "to be a number", "and", "to resolve to", 1).await.is_ok());

    let failure = check_async!(checker, "x", "to be a number").await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::AssertionFailed);

    // Synchronous definitions are not consulted asynchronously.
    let failure = check_async!(ordering(), 5, "to be greater than", 3).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::UnknownCall);
}

#[tokio::test]
async fn async_checks_can_be_spawned() {
    let checker = Checker::empty().extend([define_async_assertion(
        ["to be odd"],
        primitives::predicate("odd", |v| v.as_i64().is_some_and(|n| n % 2 == 1)),
    )
    .unwrap()]);
    let handle =
        tokio::spawn(async move { checker.check_async(vec![json!(3), json!("to be odd")]).await });
    assert!(handle.await.unwrap().is_ok());
}

#[test]
fn failures_serialise_for_diff_tools() {
    let failure = check!(ordering(), 2, "to be greater than", 3).unwrap_err();
    let mut witness = serde_json::to_value(&failure).unwrap();
    witness.as_object_mut().unwrap().remove("origin");
    assert_eq!(
        witness,
        json!({
            "kind": "assertion_failed",
            "message": "expected 2 to be greater than 3: expected number greater than 3, got 2",
            "actual": 2,
            "expected": "number greater than 3",
            "args": [2, "to be greater than", 3]
        })
    );
    let back: Failure = serde_json::from_value(witness).unwrap();
    assert_eq!(back.kind, FailureKind::AssertionFailed);
}

#[test]
fn invalid_detail_from_custom_validators() {
    let checker = Checker::empty().extend([define_assertion(
        ["to be positive"],
        primitives::from_fn("positive number", |v| match v.as_f64() {
            Some(n) if n > 0.0 => Ok(v.clone()),
            _ => Err(Invalid::mismatch("positive number", v)),
        }),
    )
    .unwrap()]);
    let failure = check!(checker, -1, "to be positive").unwrap_err();
    insta::assert_snapshot!(
        failure.message,
        @"expected -1 to be positive: expected positive number, got number"
    );
}
