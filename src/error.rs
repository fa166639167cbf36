//! Error types for loading a session and running it.
//!
//! Load errors are fatal: a session never starts with half-parsed data.
//! Once running, the only failure is losing the score record.

use thiserror::Error;

/// Anything that stops a session from being built.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing configuration key `{0}`")]
    MissingKey(String),

    #[error("configuration key `{key}` has invalid value `{value}`")]
    InvalidValue { key: String, value: String },

    #[error("layout line {line}: {reason}")]
    Layout { line: usize, reason: String },

    #[error("weather line {line}: {reason}")]
    Weather { line: usize, reason: String },

    #[error("layout has no {0} record")]
    MissingActor(&'static str),

    #[error("layout has more than one {0} record")]
    DuplicateActor(&'static str),

    #[error("passenger priority {0} has no configured fare rate")]
    UnratedPriority(u32),

    #[error("passenger distance {0} is negative")]
    NegativeDistance(i32),

    #[error("cannot read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures surfaced while the session is running.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to record score: {0}")]
    ScoreWrite(#[from] std::io::Error),
}
