// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::vegetation_service::VegetationService;
use crate::domain::vegetation::Rescaler;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::earth_engine_repository::EarthEngineRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Connect to Earth Engine before accepting any traffic
    let repository = match EarthEngineRepository::connect(&config).await {
        Ok(repository) => {
            tracing::info!("Connected to Google Earth Engine (project {})", config.earth_engine.project);
            Arc::new(repository)
        }
        Err(e) => {
            tracing::error!("Failed to connect to Google Earth Engine: {:#}", e);
            return Err(e);
        }
    };

    // Create services (application layer)
    let rescaler = Rescaler::new(config.dataset.scale_factor, config.dataset.decimals);
    let vegetation_service = VegetationService::new(repository, rescaler);

    // Create application state
    let state = Arc::new(AppState { vegetation_service });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid server.bind_addr '{}'", config.server.bind_addr))?;
    tracing::info!("Starting vegetation-patterns service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
