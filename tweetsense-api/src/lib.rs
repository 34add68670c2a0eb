//! TWEETSENSE API - REST layer for tweet sentiment records
//!
//! Serves sentiment-scored tweets from a document store behind a
//! time-boxed whole-list cache:
//! - `GET /sentiment` reads cache-first, falling back to the store
//! - `POST /sentiment` upserts a batch in order
//! - `GET /last-known-tweet` returns the greatest stored id
//! - `GET /metrics` and `/health/*` for operations

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use bootstrap::build_state;
pub use config::{CachePolicy, ServiceConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_api_router;
pub use services::{
    LatestTweetService, SentimentReadService, SentimentWriteService, WriteError, WriteReport,
};
pub use state::AppState;
pub use types::*;
