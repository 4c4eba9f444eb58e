//! Published view of a timer, also the unit of persistence.

use serde::{Deserialize, Serialize};

use crate::target::TargetId;
use crate::time::Timestamp;
use crate::timer::{RestartMode, TimerConfig};

/// Externally visible state of one timer.
///
/// A snapshot is written on every transition and is what survives a
/// restart. `finishes_at` is `None` while the timer is idle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub target: TargetId,
    pub enabled: bool,
    pub duration_seconds: u32,
    pub restart_mode: RestartMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finishes_at: Option<Timestamp>,
}

impl TimerSnapshot {
    /// Snapshot of `config` with the given deadline.
    #[must_use]
    pub fn of(config: &TimerConfig, finishes_at: Option<Timestamp>) -> Self {
        Self {
            target: config.target.clone(),
            enabled: config.enabled,
            duration_seconds: config.duration_seconds,
            restart_mode: config.restart_mode,
            finishes_at,
        }
    }

    /// Whether a deadline is currently set.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.finishes_at.is_some()
    }

    /// Whole seconds left until the deadline, clamped at zero.
    ///
    /// Returns 0 when idle or when the deadline already passed.
    #[must_use]
    pub fn remaining_seconds(&self, now: Timestamp) -> u32 {
        let Some(finishes_at) = self.finishes_at else {
            return 0;
        };
        let seconds = (finishes_at - now).num_seconds();
        if seconds <= 0 {
            0
        } else {
            u32::try_from(seconds).unwrap_or(u32::MAX)
        }
    }
}
