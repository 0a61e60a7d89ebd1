//! Call shaping: conjunction splitting and negation stripping.
//!
//! Both are computed fresh for every call and never stored.

use serde_json::Value;

/// The literal token that joins conjuncts.
pub const AND: &str = "and";

/// The prefix that negates a phrase.
pub const NOT: &str = "not ";

/// One independently checked part of a conjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunct {
    /// The conjunct's arguments prefixed with the original subject.
    pub args: Vec<Value>,

    /// For conjuncts after the first: the arguments without the subject
    /// prefix, tried when they name their own subject.
    pub standalone: Option<Vec<Value>>,
}

/// Split `args` at every literal `"and"` from position 1 onward.
///
/// Without an `"and"` the call is a single conjunct holding `args`
/// unchanged.
pub fn split_conjunction(args: Vec<Value>) -> Vec<Conjunct> {
    let Some((subject, rest)) = args.split_first() else {
        return vec![Conjunct {
            args,
            standalone: None,
        }];
    };
    if !rest.iter().any(is_and) {
        return vec![Conjunct {
            args,
            standalone: None,
        }];
    }

    rest.split(is_and)
        .enumerate()
        .map(|(index, group)| {
            let mut prefixed = Vec::with_capacity(group.len() + 1);
            prefixed.push(subject.clone());
            prefixed.extend_from_slice(group);
            Conjunct {
                args: prefixed,
                standalone: (index > 0 && group.len() >= 2).then(|| group.to_vec()),
            }
        })
        .collect()
}

fn is_and(value: &Value) -> bool {
    value.as_str() == Some(AND)
}

/// Arguments with any negation removed from the phrase position.
#[derive(Debug, Clone, PartialEq)]
pub struct Shaped {
    pub negated: bool,
    pub args: Vec<Value>,
}

/// Strip a leading `"not "` from the argument at position 1.
pub fn strip_negation(mut args: Vec<Value>) -> Shaped {
    let stripped = match args.get(1) {
        Some(Value::String(phrase)) => phrase.strip_prefix(NOT).map(str::to_string),
        _ => None,
    };
    match stripped {
        Some(phrase) => {
            args[1] = Value::String(phrase);
            Shaped {
                negated: true,
                args,
            }
        }
        None => Shaped {
            negated: false,
            args,
        },
    }
}
