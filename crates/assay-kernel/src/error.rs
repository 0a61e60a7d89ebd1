//! Construction-time errors.
//!
//! These are raised while building definitions or loading configuration,
//! never while checking a value. Check-time outcomes are [`crate::Failure`]s.

use thiserror::Error;

/// A signature or implementation that cannot become an assertion definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("assertion signature must contain at least one element")]
    EmptySignature,

    #[error("phrase at position {position} is empty")]
    EmptyPhrase { position: usize },

    #[error("phrase choice at position {position} has no alternatives")]
    EmptyChoice { position: usize },

    /// `not` is reserved for call-site negation.
    #[error("phrase {phrase:?} must not start with \"not\"")]
    NegatedPhrase { phrase: String },

    #[error("asynchronous implementation for {signature} must be defined with define_async_assertion")]
    AsyncImplementation { signature: String },
}

/// Failure to read or parse a checker configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml in {origin}: {source}")]
    ParseToml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}
