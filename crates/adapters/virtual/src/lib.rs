//! # autoff-adapter-virtual
//!
//! Virtual/demo integration that simulates a bank of controllable
//! targets. The switchboard implements both the state source and the
//! actuator side, and publishes a target-changed event for every state
//! transition so timers react exactly as they would to real hardware.
//!
//! ## Dependency rule
//!
//! Depends on `autoff-app` (port traits) and `autoff-domain` only.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use autoff_app::ports::{Actuator, EventPublisher, StateSource, Switchboard};
use autoff_domain::error::{AutoffError, NotFoundError};
use autoff_domain::event::AutoffEvent;
use autoff_domain::state::{StateChange, TargetState};
use autoff_domain::target::TargetId;
use autoff_domain::time::now;
use tokio::sync::Mutex;

/// Simulated switchboard of targets.
///
/// Targets exist once [`seed`](Self::seed)ed. Every later transition is
/// published on the event bus, including a set to the unchanged value,
/// which models attribute-only churn on a real device.
pub struct VirtualSwitchboard<B> {
    states: Mutex<BTreeMap<TargetId, TargetState>>,
    bus: Arc<B>,
}

impl<B> VirtualSwitchboard<B> {
    #[must_use]
    pub fn new(bus: Arc<B>) -> Self {
        Self {
            states: Mutex::new(BTreeMap::new()),
            bus,
        }
    }

    /// Adds `target` to the board without publishing anything.
    pub async fn seed(&self, target: TargetId, state: TargetState) {
        self.states.lock().await.insert(target, state);
    }

    /// All targets on the board with their current states, in id order.
    pub async fn states(&self) -> Vec<(TargetId, TargetState)> {
        self.states
            .lock()
            .await
            .iter()
            .map(|(target, state)| (target.clone(), *state))
            .collect()
    }
}

impl<B: EventPublisher> VirtualSwitchboard<B> {
    /// Sets `target` to `state` and publishes the change.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::NotFound`] when the target was never
    /// seeded.
    pub async fn set_state(&self, target: &TargetId, state: TargetState) -> Result<(), AutoffError> {
        self.transition(target, Some(state)).await
    }

    /// Shorthand for setting `target` to [`TargetState::On`].
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::NotFound`] when the target was never
    /// seeded.
    pub async fn turn_on(&self, target: &TargetId) -> Result<(), AutoffError> {
        self.transition(target, Some(TargetState::On)).await
    }

    /// Shorthand for setting `target` to [`TargetState::Off`].
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::NotFound`] when the target was never
    /// seeded.
    pub async fn turn_off(&self, target: &TargetId) -> Result<(), AutoffError> {
        self.transition(target, Some(TargetState::Off)).await
    }

    /// Takes `target` off the board and publishes its removal.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::NotFound`] when the target was never
    /// seeded.
    pub async fn remove(&self, target: &TargetId) -> Result<(), AutoffError> {
        self.transition(target, None).await
    }

    async fn transition(
        &self,
        target: &TargetId,
        new: Option<TargetState>,
    ) -> Result<(), AutoffError> {
        let change = {
            let mut states = self.states.lock().await;
            let Some(old) = states.get(target).copied() else {
                return Err(NotFoundError {
                    kind: "target",
                    id: target.to_string(),
                }
                .into());
            };
            match new {
                Some(state) => {
                    states.insert(target.clone(), state);
                }
                None => {
                    states.remove(target);
                }
            }
            StateChange {
                target: target.clone(),
                old: Some(old),
                new,
                at: now(),
            }
        };
        self.bus.publish(AutoffEvent::TargetChanged(change)).await
    }
}

impl<B: EventPublisher + Send + Sync + 'static> VirtualSwitchboard<B> {
    /// An actuator serving `family`, backed by this board.
    #[must_use]
    pub fn actuator(self: &Arc<Self>, family: impl Into<String>) -> Arc<dyn Actuator> {
        Arc::new(BoardActuator {
            family: family.into(),
            board: Arc::clone(self),
        })
    }
}

impl<B: Send + Sync> StateSource for VirtualSwitchboard<B> {
    async fn current_state(&self, target: &TargetId) -> Result<Option<TargetState>, AutoffError> {
        Ok(self.states.lock().await.get(target).copied())
    }
}

impl<B: EventPublisher + Send + Sync> Switchboard for VirtualSwitchboard<B> {
    async fn target_states(&self) -> Vec<(TargetId, TargetState)> {
        self.states().await
    }

    async fn set_target_state(
        &self,
        target: &TargetId,
        state: TargetState,
    ) -> Result<(), AutoffError> {
        self.set_state(target, state).await
    }
}

struct BoardActuator<B> {
    family: String,
    board: Arc<VirtualSwitchboard<B>>,
}

#[async_trait]
impl<B: EventPublisher + Send + Sync + 'static> Actuator for BoardActuator<B> {
    fn family(&self) -> &str {
        &self.family
    }

    async fn turn_off(&self, target: &TargetId) -> Result<(), AutoffError> {
        self.board.turn_off(target).await
    }
}
