//! # autoff-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a REST JSON API for timers (`/api/timers`, batch start /
//!   restart / cancel) and for the targets behind them (`/api/targets`)
//! - Map HTTP requests into registry and service-router calls
//!   (driving adapter)
//! - Map application errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `autoff-app` (port traits, registry, service router) and
//! `autoff-domain` (types used in request/response mapping). Never leaks
//! axum types into the application core.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
