//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, without reading a `.env` file.
//!
//! ## Intended use
//! Useful during development and debugging. The workspace's main `chartdesk-run` binary
//! serves the same router with `.env` support.

use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the chartdesk REST API server
///
/// # Environment Variables
/// - `CHARTDESK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PATIENT_RECORDS_PATH`: Record source file (default: resolved `patients.json`)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("chartdesk_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CHARTDESK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let records_override = std::env::var("PATIENT_RECORDS_PATH")
        .ok()
        .map(PathBuf::from);

    let state = api_rest::load_state(records_override);

    tracing::info!("-- Starting chartdesk REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_rest::router(state)).await?;

    Ok(())
}
