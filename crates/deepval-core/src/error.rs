//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout deepval. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Schema construction errors name the offending rule or registry entry.
//! - Data loading errors carry the parser's message and, for temporal
//!   values, the rejected input.
//! - Evaluation never produces an error: a type mismatch between a rule
//!   and the data is an invalid document, not a broken validator.

use thiserror::Error;

/// Top-level error type for deepval.
#[derive(Error, Debug)]
pub enum DeepvalError {
    /// Schema construction or lookup failed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Data could not be loaded into a [`Value`](crate::Value).
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Error while building a validation or resolving a registry entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A validation was built with neither a rule nor a predicate.
    #[error("no validation rule specified")]
    MissingRule,

    /// A pattern rule was built from an invalid regular expression.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The rejected expression.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A registry lookup named an entry that was never defined.
    #[error("unknown rule '{name}' in schema '{schema}'")]
    UnknownName {
        /// Name of the schema whose registry was searched.
        schema: String,
        /// The name that was looked up.
        name: String,
    },
}

/// Error while converting external data into a [`Value`](crate::Value).
#[derive(Error, Debug)]
pub enum ValueError {
    /// JSON text could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML text could not be parsed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A date, time, or datetime string could not be parsed.
    #[error("invalid {kind} {input:?}: {reason}")]
    Temporal {
        /// Which temporal kind was expected.
        kind: &'static str,
        /// The rejected input.
        input: String,
        /// Parser message.
        reason: String,
    },
}
