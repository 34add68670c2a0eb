//! Latest Tweet REST API Route
//!
//! - GET /last-known-tweet: id of the greatest stored tweet

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::{DataEnvelope, TweetIdBody};

/// GET /last-known-tweet - Id of the latest tweet
///
/// Answers 404 with an empty id, not an error body, when no tweet exists.
pub async fn last_known_tweet(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let (status, id) = match state.latest.get_latest_tweet_id().await? {
        Some(id) => (StatusCode::OK, id),
        None => (StatusCode::NOT_FOUND, String::new()),
    };
    Ok((status, Json(DataEnvelope::new(TweetIdBody { id }))))
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(last_known_tweet))
}
