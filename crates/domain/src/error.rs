//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`AutoffError`]
//! via `#[from]` or by boxing the source. No `String` variants.

use thiserror::Error;

/// Top-level error returned by autoff operations.
#[derive(Debug, Error)]
pub enum AutoffError {
    /// A request or configuration value failed validation.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced timer or target does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Snapshot persistence failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A downstream turn-off dispatch failed.
    #[error("dispatch error")]
    Dispatch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Validation failures for service calls and configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A service call carried an empty target list.
    #[error("target list must not be empty")]
    EmptyTargets,

    /// A duration was outside the supported range.
    #[error("duration must be within 1..=86400 seconds, got {0}")]
    DurationOutOfRange(u32),

    /// A target id was not of the `family.object` form.
    #[error("malformed target id `{0}`")]
    MalformedTargetId(String),

    /// A target's family is not in the configured eligible set.
    #[error("family `{0}` is not eligible for auto-off timers")]
    IneligibleFamily(String),

    /// A timer configuration was built without a target.
    #[error("timer config is missing a target")]
    MissingTarget,
}

/// A lookup failed to resolve the referenced item.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind} `{id}` not found")]
pub struct NotFoundError {
    /// Kind of the missing item (e.g. `"timer"`).
    pub kind: &'static str,
    /// The identifier that failed to resolve.
    pub id: String,
}
