use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the chartdesk application
///
/// Loads the patient record source once and serves the REST API over the resulting
/// session store. Records added through the API are kept in memory until the process
/// exits.
///
/// # Environment Variables
/// - `CHARTDESK_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_RECORDS_PATH`: Record source file (default: `patients.json` in the working
///   directory, then the bundled `data/patients.json`)
///
/// A missing or malformed source is logged and the server starts with an empty store.
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chartdesk_run=info".parse()?)
                .add_directive("chartdesk_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("CHARTDESK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let records_override = std::env::var("PATIENT_RECORDS_PATH")
        .ok()
        .map(PathBuf::from);

    let state = api_rest::load_state(records_override);

    tracing::info!("++ Starting chartdesk REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, api_rest::router(state)).await?;

    Ok(())
}
