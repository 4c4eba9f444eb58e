//! Events carried on the in-process bus.

use serde::{Deserialize, Serialize};

use crate::snapshot::TimerSnapshot;
use crate::state::StateChange;
use crate::time::Timestamp;

/// Everything the bus can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutoffEvent {
    /// A target's observed state changed.
    TargetChanged(StateChange),
    /// A timer transitioned or re-published its remaining time.
    TimerUpdated(TimerUpdate),
}

/// Observable value a timer publishes on every transition and tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerUpdate {
    pub snapshot: TimerSnapshot,
    /// Seconds left at the moment of publication, clamped at zero.
    pub remaining_seconds: u32,
    pub at: Timestamp,
}
