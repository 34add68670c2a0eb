//! REST API Routes Module
//!
//! Includes:
//! - Tweet sentiment listing and submission
//! - Latest tweet id lookup
//! - Health check endpoints (Kubernetes-compatible)
//! - Prometheus metrics

pub mod health;
pub mod last_known_tweet;
pub mod sentiment;

use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Router};

use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

// Re-export route creation functions for convenience
pub use health::create_router as health_router;
pub use last_known_tweet::create_router as last_known_tweet_router;
pub use sentiment::create_router as sentiment_router;

/// Create the complete API router.
///
/// Every route, including health and metrics, runs inside the
/// observability middleware.
pub fn create_api_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .nest("/sentiment", sentiment::create_router())
        .nest("/last-known-tweet", last_known_tweet::create_router())
        .nest("/health", health::create_router())
        .route("/metrics", get(metrics_handler))
        .layer(from_fn(observability_middleware))
        .with_state(state)
}
