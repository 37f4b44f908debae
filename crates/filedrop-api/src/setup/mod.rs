//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use crate::services::UploadPipeline;
use crate::state::AppState;
use anyhow::{Context, Result};
use filedrop_core::Config;
use filedrop_storage::{create_storage, ObjectWriter};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        backend = %config.storage_backend,
        default_bucket = %config.default_bucket,
        "Configuration loaded and validated successfully"
    );

    // Setup storage
    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;

    // Build the upload pipeline from the configured policy
    let validators = config.validators()?;
    let writer = ObjectWriter::new(storage.clone(), config.default_bucket.clone())
        .with_retry_policy(config.retry_policy());
    let pipeline = UploadPipeline::new(validators, writer);

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        pipeline,
    });

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
