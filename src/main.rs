//! School Reports Server
//!
//! Main entry point for the report HTTP service.

use std::env;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use school_reports::api::{AppState, create_router};
use school_reports::config::ConfigLoader;
use school_reports::store::JsonDirStore;

const DEFAULT_CONFIG_DIR: &str = "./config/school";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "school_reports=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_dir =
        env::var("SCHOOL_REPORTS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let mut config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("Failed to load configuration from {}", config_dir))?;

    match env::var("SCHOOL_REPORTS_API_TOKEN") {
        Ok(token) if !token.trim().is_empty() => {
            config = config.with_api_token(token.trim());
        }
        _ => warn!("SCHOOL_REPORTS_API_TOKEN not set, using the token from server.yaml"),
    }

    info!(
        school = %config.school().name,
        currency = %config.school().currency,
        data_dir = %config.server().data_dir.display(),
        "Configuration loaded"
    );

    let store = JsonDirStore::new(&config.server().data_dir);
    let addr = config.server().bind_address();

    // Create router
    let app = create_router(AppState::new(config, store));

    // Start server
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
