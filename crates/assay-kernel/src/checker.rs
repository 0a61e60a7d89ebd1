//! The invocation surface.
//!
//! A [`Checker`] is a registry plus configuration. It is cheap to clone and
//! never changes: [`Checker::extend`] hands back a new checker, leaving the
//! original recognising exactly what it recognised before.

use crate::config::CheckerConfig;
use crate::definition::AssertionDefinition;
use crate::failure::{CallSite, Failure};
use crate::matcher::Dispatcher;
use crate::registry::{Mode, Registry};
use serde_json::Value;
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Checker {
    registry: Registry,
    config: Arc<CheckerConfig>,
}

impl Checker {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            config: Arc::default(),
        }
    }

    /// A checker that recognises nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_config(self, config: CheckerConfig) -> Self {
        Self {
            config: Arc::new(config),
            ..self
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// A new checker recognising this one's definitions followed by
    /// `definitions`. Configuration is shared.
    pub fn extend(&self, definitions: impl IntoIterator<Item = AssertionDefinition>) -> Checker {
        Checker {
            registry: self.registry.extend(definitions),
            config: self.config.clone(),
        }
    }

    /// Check `args` (subject first) against the synchronous definitions.
    #[track_caller]
    pub fn check(&self, args: Vec<Value>) -> Result<(), Failure> {
        let site = self.site(Location::caller());
        Dispatcher::new(&self.registry, Mode::Sync, &self.config, site).dispatch(args)
    }

    /// Check `args` against the asynchronous definitions.
    ///
    /// The returned future always yields once before matching.
    #[track_caller]
    pub fn check_async(
        &self,
        args: Vec<Value>,
    ) -> impl Future<Output = Result<(), Failure>> + Send + '_ {
        let site = self.site(Location::caller());
        async move {
            tokio::task::yield_now().await;
            Dispatcher::new(&self.registry, Mode::Async, &self.config, site)
                .dispatch_async(args)
                .await
        }
    }

    /// Fail unconditionally, bypassing matching.
    #[track_caller]
    pub fn fail(&self, reason: Option<&str>) -> Result<(), Failure> {
        Err(self.site(Location::caller()).explicit(reason))
    }

    fn site(&self, origin: &'static Location<'static>) -> CallSite {
        CallSite::new(origin, self.config.diagnostics.max_value_width)
    }
}
