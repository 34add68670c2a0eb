//! Service Layer
//!
//! Business logic between the routes and the gateways. Routes stay thin:
//! they decode the request, call one service method and shape the response.

mod latest;
mod read;
mod write;

pub use latest::LatestTweetService;
pub use read::SentimentReadService;
pub use write::{SentimentWriteService, WriteError, WriteReport};

use std::future::Future;
use std::time::Instant;
use tweetsense_core::StoreResult;

use crate::telemetry::with_metrics;

/// Run a store call, recording its latency and outcome.
pub(crate) async fn observe_store<T, F>(operation: &'static str, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    let start = Instant::now();
    let result = call.await;
    let elapsed = start.elapsed();

    with_metrics(|metrics| {
        metrics.record_store_operation(operation, result.is_ok(), elapsed.as_secs_f64())
    });
    tracing::debug!(
        operation,
        success = result.is_ok(),
        duration_ms = elapsed.as_millis(),
        "Store operation"
    );

    result
}
