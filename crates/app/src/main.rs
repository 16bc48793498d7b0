//! Huddle - serverless planning poker
//!
//! Terminal client: joins a room, renders it after every change, and lets
//! you add simulated participants to try the flow end to end.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod peers;
mod render;
mod room;
mod state;

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    let app_state = state::AppState::new();

    // Initialize logging; RUST_LOG wins over the config file
    let fallback = app_state
        .as_ref()
        .ok()
        .and_then(|s| s.config().log_filter.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .init();

    tracing::info!("Starting Huddle");

    let app_state = match app_state {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let room_id = app_state.room_id(std::env::args().nth(1).as_deref());
    if let Err(e) = runtime.block_on(room::run(app_state, room_id)) {
        tracing::error!("Room session failed: {}", e);
        std::process::exit(1);
    }
}
