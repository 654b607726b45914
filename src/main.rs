//! Chirpy - authentication and session API server

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chirpy::{
    config::{Args, LogFormat},
    server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("chirpy={},info", args.log_level).into());
    let (text_layer, json_layer) = match args.log_format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Chirpy API");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Platform: {}", if args.is_dev() { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("JWT secret: {}", if args.jwt_secret.is_some() { "configured" } else { "built-in (dev)" });
    info!("Polka key: {}", if args.polka_key.is_some() { "configured" } else { "built-in (dev)" });
    info!("Log format: {:?}", args.log_format);
    info!("======================================");

    let state = Arc::new(server::AppState::new(args)?);

    // Run the server
    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
