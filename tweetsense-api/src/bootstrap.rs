//! Startup wiring.
//!
//! Connects both backends and checks they answer before the listener is
//! bound, so the first request never sees an unconnected cache.

use secrecy::ExposeSecret;
use std::sync::Arc;
use tweetsense_storage::{CosmosStore, DocumentStore, RedisCache};

use crate::config::ServiceConfig;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Build the application state from configuration.
///
/// Fails if the cache cannot be reached. The store is only pinged for a
/// log line; an unreachable store at boot is reported by `/health/ready`.
pub async fn build_state(config: &ServiceConfig) -> ApiResult<AppState> {
    let store = CosmosStore::new(config.cosmos.clone())?;

    let cache = RedisCache::connect(config.redis_url.expose_secret())
        .await
        .map_err(|e| ApiError::service_unavailable(format!("Cache connection failed: {}", e)))?;
    tracing::info!("Cache connected");

    match store.ping().await {
        Ok(()) => tracing::info!(
            database = %config.cosmos.database,
            container = %config.cosmos.container,
            "Document store reachable"
        ),
        Err(e) => tracing::warn!(error = %e, "Document store not reachable at startup"),
    }

    Ok(AppState::new(
        Arc::new(store),
        Arc::new(cache),
        config.cache_policy,
        config.id_ordering,
    ))
}
