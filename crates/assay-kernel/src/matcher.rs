//! The matcher / dispatcher.
//!
//! ```text
//! args ─▶ split "and" ─▶ per conjunct: strip "not " ─▶ scan definitions
//!                                                          │
//!                   exact ─┬─ candidate ─┬─ nothing ───────┘
//!                          ▼             ▼        ▼
//!                        run ◀───────────┘   unknown_call
//!                          │
//!                   apply negation ─▶ next conjunct or done
//! ```
//!
//! Definitions are always scanned in registration order. The first exact
//! match wins, but the scan continues so that a second exact match can be
//! reported as an ambiguity. With no exact match the first-registered
//! candidate wins.

use crate::call::{self, Conjunct};
use crate::config::CheckerConfig;
use crate::definition::{AssertionDefinition, Match};
use crate::failure::{CallSite, Failure, Rejection};
use crate::registry::{Mode, Registry};
use serde_json::Value;
use tracing::{debug, trace};

/// Outcome of scanning one collection for one argument list.
#[derive(Debug)]
pub enum Resolution<'r> {
    Found {
        definition: &'r AssertionDefinition,
        matched: Match,
    },
    Ambiguous {
        first: &'r AssertionDefinition,
        second: &'r AssertionDefinition,
    },
    Unknown {
        rejections: Vec<Rejection>,
    },
}

/// Scan `definitions` in order and pick the one that handles `args`.
///
/// At most `max_rejections` rejection reasons are kept; `None` keeps all.
pub fn resolve<'r>(
    definitions: &'r [AssertionDefinition],
    args: &[Value],
    max_rejections: Option<usize>,
) -> Resolution<'r> {
    let mut exact: Option<(&'r AssertionDefinition, Match)> = None;
    let mut candidate: Option<(&'r AssertionDefinition, Match)> = None;
    let mut rejections = Vec::new();

    for definition in definitions {
        match definition.try_match(args) {
            Ok(matched) if matched.exact => {
                if let Some((first, _)) = &exact {
                    return Resolution::Ambiguous {
                        first: *first,
                        second: definition,
                    };
                }
                exact = Some((definition, matched));
            }
            Ok(matched) => {
                if candidate.is_none() {
                    candidate = Some((definition, matched));
                }
            }
            Err(mismatch) => {
                trace!(definition = definition.signature(), %mismatch, "rejected");
                if max_rejections.is_none_or(|max| rejections.len() < max) {
                    rejections.push(Rejection {
                        definition: definition.signature().to_string(),
                        slot: mismatch.slot,
                        reason: mismatch.reason,
                    });
                }
            }
        }
    }

    match exact.or(candidate) {
        Some((definition, matched)) => Resolution::Found {
            definition,
            matched,
        },
        None => Resolution::Unknown { rejections },
    }
}

/// A conjunct bound to the definition that will run it.
struct Selected<'r> {
    definition: &'r AssertionDefinition,
    values: Vec<Value>,
    /// Arguments as written, negation prefix included.
    raw: Vec<Value>,
    negated: bool,
}

/// One call's worth of dispatch state.
pub(crate) struct Dispatcher<'a> {
    registry: &'a Registry,
    mode: Mode,
    config: &'a CheckerConfig,
    site: CallSite,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        mode: Mode,
        config: &'a CheckerConfig,
        site: CallSite,
    ) -> Self {
        Self {
            registry,
            mode,
            config,
            site,
        }
    }

    pub(crate) fn dispatch(&self, args: Vec<Value>) -> Result<(), Failure> {
        for conjunct in self.split(args) {
            let selected = self.select(conjunct)?;
            let outcome = selected
                .definition
                .run(&selected.values, &selected.raw, &self.site);
            self.apply_negation(&selected, outcome)?;
        }
        Ok(())
    }

    pub(crate) async fn dispatch_async(&self, args: Vec<Value>) -> Result<(), Failure> {
        for conjunct in self.split(args) {
            let mut selected = self.select(conjunct)?;
            let values = std::mem::take(&mut selected.values);
            let outcome = selected
                .definition
                .run_async(values, &selected.raw, &self.site)
                .await;
            self.apply_negation(&selected, outcome)?;
        }
        Ok(())
    }

    fn split(&self, args: Vec<Value>) -> Vec<Conjunct> {
        let conjuncts = call::split_conjunction(args);
        if conjuncts.len() > 1 {
            debug!(conjuncts = conjuncts.len(), "split conjunction");
        }
        conjuncts
    }

    fn select(&self, conjunct: Conjunct) -> Result<Selected<'a>, Failure> {
        let raw = conjunct.args;
        let rejections = match self.bind(raw.clone())? {
            Ok(selected) => return Ok(selected),
            Err(rejections) => rejections,
        };

        // A later conjunct may name its own subject, but never a phrase.
        let standalone = conjunct
            .standalone
            .filter(|alone| !alone.first().is_some_and(|first| self.is_phrase(first)));
        if let Some(standalone) = standalone {
            if let Ok(selected) = self.bind(standalone)? {
                debug!(
                    definition = selected.definition.signature(),
                    "conjunct matched with its own subject"
                );
                return Ok(selected);
            }
        }

        debug!(args = %self.site.describe_args(&raw), "unknown call");
        Err(self.unknown(&raw, rejections))
    }

    /// Resolve one argument list. The inner `Err` carries the rejections
    /// when nothing matched; the outer one is a fatal ambiguity.
    #[allow(clippy::type_complexity)]
    fn bind(&self, raw: Vec<Value>) -> Result<Result<Selected<'a>, Vec<Rejection>>, Failure> {
        let shaped = call::strip_negation(raw.clone());
        let definitions = self.registry.definitions(self.mode);
        match resolve(
            definitions,
            &shaped.args,
            self.config.diagnostics.max_rejections,
        ) {
            Resolution::Found {
                definition,
                matched,
            } => {
                debug!(
                    definition = definition.signature(),
                    exact = matched.exact,
                    negated = shaped.negated,
                    "selected"
                );
                Ok(Ok(Selected {
                    definition,
                    values: matched.values,
                    raw,
                    negated: shaped.negated,
                }))
            }
            Resolution::Ambiguous { first, second } => {
                debug!(
                    first = first.signature(),
                    second = second.signature(),
                    "ambiguous"
                );
                Err(self
                    .site
                    .ambiguous(&raw, first.signature(), second.signature()))
            }
            Resolution::Unknown { rejections } => Ok(Err(rejections)),
        }
    }

    /// Whether `value`, negated or not, is a phrase some definition uses.
    fn is_phrase(&self, value: &Value) -> bool {
        let Some(text) = value.as_str() else {
            return false;
        };
        let text = text.strip_prefix(call::NOT).unwrap_or(text);
        self.registry.uses_phrase(self.mode, text)
    }

    fn unknown(&self, raw: &[Value], rejections: Vec<Rejection>) -> Failure {
        let suggestions = if self.config.diagnostics.suggest_phrases {
            self.registry.phrases(self.mode, raw.len())
        } else {
            Vec::new()
        };
        self.site.unknown_call(raw, rejections, &suggestions)
    }

    fn apply_negation(
        &self,
        selected: &Selected<'_>,
        outcome: Result<(), Failure>,
    ) -> Result<(), Failure> {
        if !selected.negated {
            return outcome;
        }
        match outcome {
            Ok(()) => Err(self
                .site
                .negation_violated(selected.definition.slots(), &selected.raw)),
            Err(failure) if failure.is_assertion() => {
                trace!(message = %failure.message, "negated failure accepted");
                Ok(())
            }
            Err(failure) => Err(failure),
        }
    }
}
