//! Taskdeck API server — multi-user todo backend.
//!
//! An axum HTTP server exposing authenticated, per-user task CRUD. State
//! is kept in memory and persisted as a JSON snapshot between runs.
//!
//! # Usage
//!
//! ```bash
//! # Run on the default address 127.0.0.1:8000
//! cargo run --bin taskdeck-server
//!
//! # Run on a custom address with persistence disabled
//! cargo run --bin taskdeck-server -- --bind 0.0.0.0:9000 --data-path ""
//!
//! # Or via environment variables
//! TASKDECK_ADDR=0.0.0.0:9000 TASKDECK_SECRET=change-me cargo run --bin taskdeck-server
//! ```

use clap::Parser;
use taskdeck_server::api::{self, AppState};
use taskdeck_server::config::{ServerCliArgs, ServerConfig};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.uses_default_secret() {
        tracing::warn!("using the built-in development token secret; set TASKDECK_SECRET in production");
    }

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to load state snapshot");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %config.bind_addr, "starting taskdeck api server");

    match api::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "api server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "api server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start api server");
            std::process::exit(1);
        }
    }
}
