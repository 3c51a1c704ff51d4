//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the REST server (with
//! OpenAPI/Swagger UI) and no dotenv handling. The workspace's main `materna-run` binary is the
//! deployment entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, AppState};
use materna_core::{
    resolve_service_account, CoreConfig, ServiceCatalog, DEFAULT_CREDENTIALS_FILE,
    DEFAULT_DATA_DIR,
};

/// Main entry point for the Materna REST API server
///
/// Starts the REST API server on the configured address (default: 0.0.0.0:10000).
/// Provides HTTP endpoints for the registration-to-summary workflow with
/// OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `MATERNA_REST_ADDR`: Server address (default: "0.0.0.0:10000")
/// - `MATERNA_DATA_DIR`: Record storage directory (default: "materna_data")
/// - `MATERNA_CREDENTIALS_B64`: Base64-encoded service-account JSON
/// - `MATERNA_CREDENTIALS_FILE`: Credentials file path (default: "serviceAccountKey.json")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - no store credentials can be resolved,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MATERNA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:10000".into());

    tracing::info!("-- Starting Materna REST API on {}", addr);

    let data_dir = std::env::var("MATERNA_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    std::fs::create_dir_all(&data_dir)?;

    let credentials_file = std::env::var("MATERNA_CREDENTIALS_FILE")
        .unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.into());
    let credentials_blob = std::env::var("MATERNA_CREDENTIALS_B64").ok();
    let service_account =
        resolve_service_account(credentials_blob.as_deref(), Path::new(&credentials_file))?;

    tracing::info!("-- Writing records as {}", service_account.client_email);

    let cfg = Arc::new(CoreConfig::new(PathBuf::from(data_dir), service_account)?);
    let state = AppState::new(cfg, Arc::new(ServiceCatalog::standard()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
