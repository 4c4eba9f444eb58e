//! Pure decision table mapping a target's state change to a timer action.
//!
//! ## Responsibilities
//! - Decide, from one observed [`StateChange`], whether a timer ignores
//!   the event, cancels itself, or re-arms.
//!
//! ## Dependency rule
//! No IO. The async layers call [`decide`] and carry out the result.

use crate::state::TargetState;
use crate::timer::RestartMode;

/// What a timer does in reaction to its target's state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Leave the timer as it is.
    Ignore,
    /// Disarm the timer without turning anything off.
    Cancel,
    /// Arm the timer anew with its configured duration.
    Restart,
}

/// Decides the timer's reaction to one state change of its target.
///
/// Ordering matters. A removal (`new` is `None`) is ignored outright. A
/// target that is no longer `on` cancels the timer even when the timer
/// is disabled, keeping the armed state in step with reality. Only
/// re-arming is gated on `enabled` and on the restart mode.
#[must_use]
pub fn decide(
    enabled: bool,
    restart_mode: RestartMode,
    old: Option<TargetState>,
    new: Option<TargetState>,
) -> ReconcileAction {
    let Some(new) = new else {
        return ReconcileAction::Ignore;
    };
    if !new.is_on() {
        return ReconcileAction::Cancel;
    }
    if !enabled {
        return ReconcileAction::Ignore;
    }
    match restart_mode {
        RestartMode::Never => ReconcileAction::Ignore,
        RestartMode::OnOnly => {
            if old.is_none_or(|old| !old.is_on()) {
                ReconcileAction::Restart
            } else {
                ReconcileAction::Ignore
            }
        }
        RestartMode::AnyChange => ReconcileAction::Restart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TargetState::{Off, On, Unavailable, Unknown};

    #[test]
    fn should_ignore_removal_events() {
        assert_eq!(
            decide(true, RestartMode::AnyChange, Some(On), None),
            ReconcileAction::Ignore
        );
    }

    #[test]
    fn should_cancel_when_target_turns_off() {
        assert_eq!(
            decide(true, RestartMode::OnOnly, Some(On), Some(Off)),
            ReconcileAction::Cancel
        );
    }

    #[test]
    fn should_cancel_when_target_becomes_unknown_or_unavailable() {
        for state in [Unknown, Unavailable] {
            assert_eq!(
                decide(true, RestartMode::OnOnly, Some(On), Some(state)),
                ReconcileAction::Cancel
            );
        }
    }

    #[test]
    fn should_cancel_on_off_even_when_disabled() {
        assert_eq!(
            decide(false, RestartMode::OnOnly, Some(On), Some(Off)),
            ReconcileAction::Cancel
        );
    }

    #[test]
    fn should_ignore_on_transition_when_disabled() {
        assert_eq!(
            decide(false, RestartMode::OnOnly, Some(Off), Some(On)),
            ReconcileAction::Ignore
        );
    }

    #[test]
    fn should_ignore_on_transition_when_mode_is_never() {
        assert_eq!(
            decide(true, RestartMode::Never, Some(Off), Some(On)),
            ReconcileAction::Ignore
        );
    }

    #[test]
    fn should_restart_on_transition_into_on() {
        assert_eq!(
            decide(true, RestartMode::OnOnly, Some(Off), Some(On)),
            ReconcileAction::Restart
        );
        assert_eq!(
            decide(true, RestartMode::OnOnly, None, Some(On)),
            ReconcileAction::Restart
        );
        assert_eq!(
            decide(true, RestartMode::OnOnly, Some(Unavailable), Some(On)),
            ReconcileAction::Restart
        );
    }

    #[test]
    fn should_not_restart_on_attribute_churn_in_on_only_mode() {
        assert_eq!(
            decide(true, RestartMode::OnOnly, Some(On), Some(On)),
            ReconcileAction::Ignore
        );
    }

    #[test]
    fn should_restart_on_attribute_churn_in_any_change_mode() {
        assert_eq!(
            decide(true, RestartMode::AnyChange, Some(On), Some(On)),
            ReconcileAction::Restart
        );
    }
}
