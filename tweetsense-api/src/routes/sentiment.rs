//! Tweet Sentiment REST API Routes
//!
//! - GET /sentiment: every stored tweet, served cache-first
//! - POST /sentiment: upsert a batch of tweets

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;
use tweetsense_core::Tweet;

use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::state::AppState;
use crate::types::{Acknowledgement, DataEnvelope};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /sentiment - List all sentiment-scored tweets
pub async fn list_tweets(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let tweets = state.read.get_all_sentiment_tweets().await?;
    Ok(Json(DataEnvelope::new(tweets)))
}

/// POST /sentiment - Persist a batch of tweets
///
/// The whole batch is validated before anything is written.
pub async fn submit_tweets(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<DataEnvelope<Vec<Tweet>>>,
) -> ApiResult<impl IntoResponse> {
    for tweet in &body.data {
        tweet.validate()?;
    }

    state.write.submit_tweets(&body.data).await?;
    Ok(Json(Acknowledgement {}))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the sentiment router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_tweets).post(submit_tweets))
}
