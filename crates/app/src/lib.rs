//! # autoff-app
//!
//! Application layer — the timer state machines and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `TimerScheduler` — run a callback at an instant or on an interval
//!   - `StateSource` — read a target's current on/off state
//!   - `SnapshotStore` — persist and restore timer snapshots
//!   - `Actuator` — turn a target off, keyed by device family
//!   - `EventPublisher` — publish events to interested subscribers
//! - Run the per-target countdown machine (`AutoOffTimer`): arm, re-arm,
//!   cancel, expire, restore across restarts, reconcile with observed
//!   target state changes
//! - Hold all live timers in a `TimerRegistry` and fan service calls out
//!   to them through the `TimerRouter`
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `autoff-domain` only (plus `tokio::sync` for channels and
//! locks). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod event_bus;
pub mod ports;
pub mod registry;
pub mod router;
pub mod timer;
pub mod watcher;
