//! # autoffd — auto-off daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`autoff.toml`, env var overrides)
//! - Initialize tracing
//! - Construct the scheduler, snapshot store, event bus and virtual
//!   switchboard
//! - Attach one auto-off timer per configured target, restoring persisted
//!   deadlines
//! - Spawn the watcher that routes target state changes to the timers
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT/SIGTERM), detaching timers so armed
//!   deadlines stay persisted for the next boot
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::EnvFilter;

use autoff_adapter_http_axum::state::AppState;
use autoff_adapter_scheduler_tokio::TokioScheduler;
use autoff_adapter_snapshot_json::JsonSnapshotStore;
use autoff_adapter_virtual::VirtualSwitchboard;
use autoff_app::event_bus::InProcessEventBus;
use autoff_app::registry::TimerRegistry;
use autoff_app::watcher;
use autoff_domain::state::TargetState;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Scheduler & snapshot store
    let scheduler = Arc::new(TokioScheduler::new());
    let store = Arc::new(JsonSnapshotStore::open(config.snapshot_path()).await?);

    // Event bus & virtual switchboard
    let bus = Arc::new(InProcessEventBus::new(256));
    let board = Arc::new(VirtualSwitchboard::new(bus.clone()));

    // Timer registry
    let mut registry = TimerRegistry::new(scheduler, board.clone(), store, bus.clone())
        .with_families(config.timers.families.clone());
    for family in &config.timers.families {
        registry.register_actuator(board.actuator(family.as_str()));
    }
    let registry = Arc::new(registry);
    for timer in config.timer_configs()? {
        board.seed(timer.target.clone(), TargetState::Off).await;
        registry.attach(timer).await?;
    }

    // Event watcher
    tokio::spawn(watcher::run(registry.clone(), bus.subscribe()));

    // HTTP
    let state = AppState::new(registry.clone(), board);
    let app = autoff_adapter_http_axum::router::build(state);

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "autoffd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigint.recv() => {}
                _ = sigterm.recv() => {}
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    // Armed deadlines stay persisted and re-arm on the next boot.
    registry.detach_all().await;

    Ok(())
}
