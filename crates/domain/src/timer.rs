//! Per-target timer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AutoffError, ValidationError};
use crate::target::TargetId;

/// Shortest accepted auto-off duration, in seconds.
pub const MIN_DURATION_SECONDS: u32 = 1;
/// Longest accepted auto-off duration, one day.
pub const MAX_DURATION_SECONDS: u32 = 86_400;
/// Duration applied when a target does not configure its own.
pub const DEFAULT_DURATION_SECONDS: u32 = 300;

/// Checks a duration against the accepted range.
///
/// # Errors
///
/// Returns [`ValidationError::DurationOutOfRange`] when `seconds` is not
/// within `1..=86400`.
pub fn validate_duration(seconds: u32) -> Result<u32, ValidationError> {
    if (MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(ValidationError::DurationOutOfRange(seconds))
    }
}

/// When a timer re-arms in reaction to its target's state changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartMode {
    /// State changes never re-arm the timer.
    Never,
    /// Only a transition into `on` re-arms the timer.
    #[default]
    OnOnly,
    /// Any event while the target is `on` re-arms the timer, including
    /// attribute-only churn.
    AnyChange,
}

/// Configuration of a single auto-off timer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub target: TargetId,
    pub enabled: bool,
    pub duration_seconds: u32,
    pub restart_mode: RestartMode,
}

impl TimerConfig {
    /// Create a builder for constructing a [`TimerConfig`].
    #[must_use]
    pub fn builder() -> TimerConfigBuilder {
        TimerConfigBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Validation`] when the duration is out of
    /// range.
    pub fn validate(&self) -> Result<(), AutoffError> {
        validate_duration(self.duration_seconds)?;
        Ok(())
    }
}

/// Step-by-step builder for [`TimerConfig`].
#[derive(Debug, Default)]
pub struct TimerConfigBuilder {
    target: Option<TargetId>,
    enabled: Option<bool>,
    duration_seconds: Option<u32>,
    restart_mode: Option<RestartMode>,
}

impl TimerConfigBuilder {
    #[must_use]
    pub fn target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn duration_seconds(mut self, duration_seconds: u32) -> Self {
        self.duration_seconds = Some(duration_seconds);
        self
    }

    #[must_use]
    pub fn restart_mode(mut self, restart_mode: RestartMode) -> Self {
        self.restart_mode = Some(restart_mode);
        self
    }

    /// Consume the builder, validate, and return a [`TimerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Validation`] if the target is missing or
    /// the duration is out of range.
    pub fn build(self) -> Result<TimerConfig, AutoffError> {
        let Some(target) = self.target else {
            return Err(ValidationError::MissingTarget.into());
        };
        let config = TimerConfig {
            target,
            enabled: self.enabled.unwrap_or(true),
            duration_seconds: self.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS),
            restart_mode: self.restart_mode.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}
