//! Definition registries.
//!
//! A [`Registry`] is an ordered, immutable collection of definitions split
//! into a synchronous and an asynchronous sub-collection. Extending a
//! registry never touches it: [`Registry::extend`] returns a new registry
//! whose collections are the inherited definitions followed by the new
//! ones, each group in its original order. Registries are cheap to clone
//! and safe to share between threads.

use crate::definition::AssertionDefinition;
use crate::slot::Slot;
use std::fmt;
use std::sync::Arc;

/// Which entry point a collection serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sync,
    Async,
}

#[derive(Clone)]
pub struct Registry {
    sync: Arc<[AssertionDefinition]>,
    r#async: Arc<[AssertionDefinition]>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            sync: Arc::from(Vec::new()),
            r#async: Arc::from(Vec::new()),
        }
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = AssertionDefinition>) -> Self {
        Self::new().extend(definitions)
    }

    /// A new registry holding this one's definitions followed by
    /// `definitions`, each routed by whether its implementation is async.
    pub fn extend(&self, definitions: impl IntoIterator<Item = AssertionDefinition>) -> Registry {
        let mut sync = self.sync.to_vec();
        let mut r#async = self.r#async.to_vec();
        for definition in definitions {
            if definition.is_async() {
                r#async.push(definition);
            } else {
                sync.push(definition);
            }
        }
        Registry {
            sync: sync.into(),
            r#async: r#async.into(),
        }
    }

    pub fn definitions(&self, mode: Mode) -> &[AssertionDefinition] {
        match mode {
            Mode::Sync => &self.sync,
            Mode::Async => &self.r#async,
        }
    }

    pub fn len(&self) -> usize {
        self.sync.len() + self.r#async.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any definition has a phrase slot accepting `text`.
    pub fn uses_phrase(&self, mode: Mode, text: &str) -> bool {
        self.definitions(mode)
            .iter()
            .flat_map(AssertionDefinition::slots)
            .any(|slot| match slot {
                Slot::Literal(literal) => literal == text,
                Slot::Choice(options) => options.iter().any(|option| option == text),
                Slot::Param(_) => false,
            })
    }

    /// Distinct phrases of the definitions taking `arity` arguments, in
    /// registration order.
    pub fn phrases(&self, mode: Mode, arity: usize) -> Vec<String> {
        let mut phrases: Vec<String> = Vec::new();
        for definition in self.definitions(mode) {
            if definition.arity() != arity {
                continue;
            }
            let phrase = definition.phrase();
            if !phrase.is_empty() && !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
        phrases
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("sync", &self.sync.len())
            .field("async", &self.r#async.len())
            .finish()
    }
}
