//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod actuator;
pub mod event_bus;
pub mod scheduler;
pub mod snapshot_store;
pub mod state_source;
pub mod switchboard;

pub use actuator::Actuator;
pub use event_bus::EventPublisher;
pub use scheduler::{BoxFuture, ScheduleCallback, TimerScheduler};
pub use snapshot_store::SnapshotStore;
pub use state_source::StateSource;
pub use switchboard::Switchboard;
