//! Signature fragments and their compilation into slots.
//!
//! An assertion signature is written as an ordered list of [`Fragment`]s:
//! literal phrases, sets of alternative phrases, and typed parameters.
//! [`compile`] turns it into the [`Slot`] list that calls are matched
//! against position by position. Slot 0 always stands for the subject: when
//! a signature opens with a phrase, an accept-anything subject slot is
//! inserted in front of it.

use crate::error::DefinitionError;
use assay_validate::{Validator, primitives};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// One element of a declarative assertion signature.
#[derive(Debug, Clone)]
pub enum Fragment {
    Phrase(String),
    Choice(Vec<String>),
    Param(Validator),
}

impl From<&str> for Fragment {
    fn from(phrase: &str) -> Self {
        Fragment::Phrase(phrase.to_string())
    }
}

impl From<String> for Fragment {
    fn from(phrase: String) -> Self {
        Fragment::Phrase(phrase)
    }
}

impl From<Validator> for Fragment {
    fn from(validator: Validator) -> Self {
        Fragment::Param(validator)
    }
}

impl From<&[&str]> for Fragment {
    fn from(choices: &[&str]) -> Self {
        Fragment::Choice(choices.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Fragment {
    fn from(choices: [&str; N]) -> Self {
        Fragment::Choice(choices.iter().map(|c| c.to_string()).collect())
    }
}

impl From<Vec<String>> for Fragment {
    fn from(choices: Vec<String>) -> Self {
        Fragment::Choice(choices)
    }
}

/// One compiled matching position.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Matches only the exact string.
    Literal(String),
    /// Matches any alternative, comparing the string form of the argument.
    Choice(Vec<String>),
    /// Delegates to a validator; the validated value is passed on.
    Param(Validator),
}

impl Slot {
    /// Phrase slots take part in matching but never reach implementations.
    pub fn is_phrase(&self) -> bool {
        matches!(self, Slot::Literal(_) | Slot::Choice(_))
    }

    pub fn accepts_anything(&self) -> bool {
        matches!(self, Slot::Param(validator) if validator.accepts_anything())
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Literal(a), Slot::Literal(b)) => a == b,
            (Slot::Choice(a), Slot::Choice(b)) => a == b,
            (Slot::Param(a), Slot::Param(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Literal(text) => f.write_str(text),
            Slot::Choice(options) => write!(f, "({})", options.join("|")),
            Slot::Param(validator) => write!(f, "<{}>", validator.describe()),
        }
    }
}

/// The shared accept-anything validator used for implicit subjects.
pub fn implicit_subject() -> Validator {
    static SUBJECT: OnceLock<Validator> = OnceLock::new();
    SUBJECT.get_or_init(primitives::anything).clone()
}

/// Compile a signature into its slot list.
pub fn compile<I>(signature: I) -> Result<Vec<Slot>, DefinitionError>
where
    I: IntoIterator,
    I::Item: Into<Fragment>,
{
    let fragments: Vec<Fragment> = signature.into_iter().map(Into::into).collect();
    let Some(first) = fragments.first() else {
        return Err(DefinitionError::EmptySignature);
    };

    let mut slots = Vec::with_capacity(fragments.len() + 1);
    if !matches!(first, Fragment::Param(_)) {
        slots.push(Slot::Param(implicit_subject()));
    }

    for (position, fragment) in fragments.into_iter().enumerate() {
        let slot = match fragment {
            Fragment::Phrase(phrase) => {
                check_phrase(&phrase, position)?;
                Slot::Literal(phrase)
            }
            Fragment::Choice(options) => {
                if options.is_empty() {
                    return Err(DefinitionError::EmptyChoice { position });
                }
                for option in &options {
                    check_phrase(option, position)?;
                }
                Slot::Choice(options)
            }
            Fragment::Param(validator) => Slot::Param(validator),
        };
        slots.push(slot);
    }
    Ok(slots)
}

fn check_phrase(phrase: &str, position: usize) -> Result<(), DefinitionError> {
    if phrase.is_empty() {
        return Err(DefinitionError::EmptyPhrase { position });
    }
    if phrase == "not" || phrase.starts_with("not ") {
        return Err(DefinitionError::NegatedPhrase {
            phrase: phrase.to_string(),
        });
    }
    Ok(())
}

/// Render a slot list as `<any> to be greater than <number>`.
pub fn render(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(Slot::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// String form used by choice slots and message rendering.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
