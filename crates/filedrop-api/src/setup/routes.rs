//! Route configuration and setup

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use filedrop_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // The body cap bounds memory per request. It is deliberately independent
    // of the per-file maximum: an oversized file must still arrive intact so
    // the validators can reject it with a per-file result.
    let body_limit = config.max_request_body_size as usize;

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let app = Router::new()
        .route("/health", get(health_check))
        .route(
            &format!("{}/objects", API_PREFIX),
            post(handlers::upload::upload_objects),
        )
        .route(
            &format!("{}/objects/{{id}}", API_PREFIX),
            get(handlers::object::get_object),
        )
        .route(
            &format!("{}/objects/{{id}}/file", API_PREFIX),
            get(handlers::object::download_object),
        )
        .route(
            &format!("{}/objects/{{id}}", API_PREFIX),
            delete(handlers::object::delete_object),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods: Result<Vec<Method>, _> = config
        .cors_methods
        .iter()
        .map(|m| m.parse::<Method>())
        .collect();
    let methods = methods.map_err(|e| anyhow::anyhow!("Invalid CORS method: {}", e))?;

    let headers: Result<Vec<HeaderName>, _> = config
        .cors_headers
        .iter()
        .map(|h| h.parse::<HeaderName>())
        .collect();
    let headers = headers.map_err(|e| anyhow::anyhow!("Invalid CORS header: {}", e))?;

    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        let origins = origins.map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    };
    Ok(cors)
}

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: String,
    storage: String,
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let mut response = HealthCheckResponse {
        status: "healthy".to_string(),
        storage: "unknown".to_string(),
    };

    // Check storage - try a lightweight exists check with a non-existent key
    // This verifies connectivity without creating files
    match tokio::time::timeout(
        TIMEOUT,
        state.storage.exists("health-check-non-existent-key"),
    )
    .await
    {
        Ok(Ok(_)) => {
            response.storage = "healthy".to_string();
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Storage health check warning");
            response.storage = format!("degraded: {}", e);
            // Storage issues don't fail overall health (graceful degradation)
        }
        Err(_) => {
            tracing::warn!("Storage health check timed out");
            response.storage = "timeout".to_string();
        }
    }

    (StatusCode::OK, Json(response))
}
