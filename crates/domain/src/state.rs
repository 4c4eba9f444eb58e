//! Target states and state-change events.

use crate::target::TargetId;
use crate::time::Timestamp;

/// Reported state of a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    On,
    Off,
    /// The target exists but its state could not be determined.
    Unknown,
    /// The target's backing device is unreachable.
    Unavailable,
}

impl TargetState {
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    #[must_use]
    pub fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }
}

impl std::fmt::Display for TargetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Unknown => "unknown",
            Self::Unavailable => "unavailable",
        };
        f.write_str(label)
    }
}

/// A single observed transition of a target's state.
///
/// `old` is `None` when the target was first seen, `new` is `None` when
/// the target is being removed. An event where `old == new` reports a
/// change to the target's attributes with the state itself untouched.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StateChange {
    pub target: TargetId,
    pub old: Option<TargetState>,
    pub new: Option<TargetState>,
    pub at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_states_as_snake_case() {
        assert_eq!(serde_json::to_string(&TargetState::On).unwrap(), "\"on\"");
        assert_eq!(
            serde_json::to_string(&TargetState::Unavailable).unwrap(),
            "\"unavailable\""
        );
    }

    #[test]
    fn should_report_on_and_off() {
        assert!(TargetState::On.is_on());
        assert!(TargetState::Off.is_off());
        assert!(!TargetState::Unknown.is_on());
        assert!(!TargetState::Unavailable.is_off());
    }
}
