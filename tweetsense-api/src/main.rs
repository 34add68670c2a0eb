//! TWEETSENSE API Server Entry Point
//!
//! Loads configuration, connects the backends and starts the Axum HTTP
//! server.

use tweetsense_api::telemetry::{init_tracing, TelemetryConfig};
use tweetsense_api::{build_state, create_api_router, ApiError, ApiResult, ServiceConfig};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing(&TelemetryConfig::default())?;

    let config = ServiceConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        ApiError::from(e)
    })?;

    let state = build_state(&config).await?;
    let app = create_api_router(state);

    let addr = config.bind_addr();
    tracing::info!(
        %addr,
        environment = %config.environment,
        id_ordering = %config.id_ordering,
        cache_ttl_secs = config.cache_policy.ttl.as_secs(),
        invalidate_on_write = config.cache_policy.invalidate_on_write,
        "Starting Tweetsense API server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
