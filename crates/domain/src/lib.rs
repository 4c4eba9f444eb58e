//! # autoff-domain
//!
//! Pure domain model for the autoff auto-off timer system.
//!
//! ## Responsibilities
//! - Foundational types: validated target identifiers, error conventions, timestamps
//! - Define **`TargetState`** (the observed on/off state of a device) and
//!   **`StateChange`** deliveries
//! - Define **`TimerConfig`** (per-target policy: enabled, duration, restart mode)
//! - Define **`TimerSnapshot`** (the published observable, including the
//!   ISO-8601 deadline)
//! - Contain the pure reconciliation rule table that maps a state change to a
//!   timer decision
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod event;
pub mod reconcile;
pub mod snapshot;
pub mod state;
pub mod target;
pub mod time;
pub mod timer;
