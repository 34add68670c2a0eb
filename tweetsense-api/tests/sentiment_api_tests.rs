//! End-to-end tests for the sentiment endpoints over in-memory backends.


use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use test_support::{get_request, router_over, send, send_text, TestApp, TestResult};
use tweetsense_api::CachePolicy;
use tweetsense_core::{IdOrdering, Tweet, TweetDocument};
use tweetsense_storage::{CacheStore, DocumentStore, InMemoryCache, InMemoryStore, TWEETS_CACHE_KEY};
use tweetsense_test_utils::doubles::{CountingStore, FailingCache, FailingStore};
use tweetsense_test_utils::fixtures::{data_envelope, sample_tweet, sample_tweets};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

// ============================================================================
// GET /sentiment
// ============================================================================

#[tokio::test]
async fn cached_list_is_served_without_touching_store() -> TestResult {
    let store = CountingStore::new(InMemoryStore::new());
    let cache = InMemoryCache::new();
    let cached = sample_tweets(&["c1", "c2"]);
    cache
        .insert_raw(TWEETS_CACHE_KEY, &serde_json::to_string(&cached)?, DAY)
        .await;
    let router = router_over(
        Arc::new(store.clone()),
        Arc::new(cache),
        CachePolicy::default(),
        IdOrdering::default(),
    );

    let (status, body) = send(&router, get_request("/sentiment")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, data_envelope(&cached));
    assert_eq!(store.queries(), 0);
    Ok(())
}

#[tokio::test]
async fn miss_reads_store_in_order_and_caches_for_a_day() -> TestResult {
    let app = TestApp::new();
    let (status, _) = app.post("/sentiment", &data_envelope(&sample_tweets(&["t1", "t2"]))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/sentiment").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, data_envelope(&sample_tweets(&["t1", "t2"])));

    let raw = app.cache.get(TWEETS_CACHE_KEY).await?.ok_or("tweets were not cached")?;
    let cached: Vec<Tweet> = serde_json::from_str(&raw)?;
    assert_eq!(cached, sample_tweets(&["t1", "t2"]));
    assert_eq!(app.cache.ttl_of(TWEETS_CACHE_KEY).await, Some(DAY));
    Ok(())
}

#[tokio::test]
async fn empty_store_is_not_cached() -> TestResult {
    let app = TestApp::new();

    let (status, body) = app.get("/sentiment").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [] }));
    assert!(!app.cache.contains(TWEETS_CACHE_KEY).await);

    app.post("/sentiment", &data_envelope(&[sample_tweet("first")])).await?;
    let (_, body) = app.get("/sentiment").await?;
    assert_eq!(body, data_envelope(&[sample_tweet("first")]));
    Ok(())
}

#[tokio::test]
async fn malformed_cache_entry_behaves_like_a_miss() -> TestResult {
    let app = TestApp::new();
    app.post("/sentiment", &data_envelope(&[sample_tweet("1")])).await?;

    for raw in ["{{{", "[]", r#"[{"id":"1"}]"#, r#"{"data":[]}"#] {
        app.cache.insert_raw(TWEETS_CACHE_KEY, raw, DAY).await;
        let (status, body) = app.get("/sentiment").await?;
        assert_eq!(status, StatusCode::OK, "entry {}", raw);
        assert_eq!(body, data_envelope(&[sample_tweet("1")]), "entry {}", raw);
    }
    Ok(())
}

#[tokio::test]
async fn cache_outage_falls_back_to_store() -> TestResult {
    let store = InMemoryStore::new();
    store.upsert(TweetDocument::encode(&sample_tweet("9"))?).await?;
    let router = router_over(
        Arc::new(store),
        Arc::new(FailingCache::new()),
        CachePolicy::default(),
        IdOrdering::default(),
    );

    let (status, body) = send(&router, get_request("/sentiment")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, data_envelope(&[sample_tweet("9")]));
    Ok(())
}

#[tokio::test]
async fn stale_cache_is_served_until_it_expires() -> TestResult {
    let app = TestApp::new();
    app.post("/sentiment", &data_envelope(&[sample_tweet("1")])).await?;
    app.get("/sentiment").await?;

    app.post("/sentiment", &data_envelope(&[sample_tweet("2")])).await?;
    let (_, body) = app.get("/sentiment").await?;
    assert_eq!(body, data_envelope(&[sample_tweet("1")]));

    app.cache.delete(TWEETS_CACHE_KEY).await?;
    let (_, body) = app.get("/sentiment").await?;
    assert_eq!(body, data_envelope(&sample_tweets(&["1", "2"])));
    Ok(())
}

#[tokio::test]
async fn invalidate_on_write_refreshes_next_read() -> TestResult {
    let policy = CachePolicy {
        invalidate_on_write: true,
        ..CachePolicy::default()
    };
    let app = TestApp::with_policy(policy, IdOrdering::default());
    app.post("/sentiment", &data_envelope(&[sample_tweet("1")])).await?;
    app.get("/sentiment").await?;
    assert!(app.cache.contains(TWEETS_CACHE_KEY).await);

    app.post("/sentiment", &data_envelope(&[sample_tweet("2")])).await?;
    assert!(!app.cache.contains(TWEETS_CACHE_KEY).await);
    let (_, body) = app.get("/sentiment").await?;
    assert_eq!(body, data_envelope(&sample_tweets(&["1", "2"])));
    Ok(())
}

#[tokio::test]
async fn undecodable_store_record_is_a_server_error() -> TestResult {
    let app = TestApp::new();
    app.store
        .upsert(json!({ "id": "bad", "type": "tweet", "text": 5 }))
        .await?;

    let (status, body) = app.get("/sentiment").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert!(!app.cache.contains(TWEETS_CACHE_KEY).await);
    Ok(())
}

#[tokio::test]
async fn store_failure_is_a_server_error() -> TestResult {
    let router = router_over(
        Arc::new(FailingStore::new(InMemoryStore::new()).fail_queries()),
        Arc::new(InMemoryCache::new()),
        CachePolicy::default(),
        IdOrdering::default(),
    );

    let (status, body) = send(&router, get_request("/sentiment")?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert!(!body["message"].as_str().unwrap_or_default().contains("injected"));
    Ok(())
}

// ============================================================================
// POST /sentiment
// ============================================================================

#[tokio::test]
async fn submit_answers_empty_object_and_stores_discriminator() -> TestResult {
    let app = TestApp::new();
    let (status, body) = app.post("/sentiment", &data_envelope(&[sample_tweet("1")])).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let documents = app.store.documents().await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["type"], "tweet");
    assert_eq!(documents[0]["sentiment"]["confidenceScores"]["positive"], 0.55);
    Ok(())
}

#[tokio::test]
async fn resubmitting_an_id_replaces_it() -> TestResult {
    let app = TestApp::new();
    app.post("/sentiment", &data_envelope(&[sample_tweet("1")])).await?;

    let mut updated = sample_tweet("1");
    updated.text = "edited".to_string();
    app.post("/sentiment", &data_envelope(&[updated.clone()])).await?;

    let (_, body) = app.get("/sentiment").await?;
    assert_eq!(body, data_envelope(&[updated]));
    Ok(())
}

#[tokio::test]
async fn partial_batch_failure_keeps_prefix() -> TestResult {
    let inner = InMemoryStore::new();
    let router = router_over(
        Arc::new(FailingStore::new(inner.clone()).fail_upsert(3)),
        Arc::new(InMemoryCache::new()),
        CachePolicy::default(),
        IdOrdering::default(),
    );
    let batch = data_envelope(&sample_tweets(&["1", "2", "3", "4"]));

    let (status, body) = send(
        &router,
        test_support::post_request("/sentiment", batch.to_string())?,
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert_eq!(
        body["details"],
        json!({ "persisted": 2, "total": 4, "failedId": "3" })
    );

    let (status, body) = send(&router, get_request("/sentiment")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, data_envelope(&sample_tweets(&["1", "2"])));
    Ok(())
}

#[tokio::test]
async fn invalid_tweets_are_rejected_before_any_write() -> TestResult {
    let app = TestApp::new();

    let mut blank_id = sample_tweet("2");
    blank_id.id = "  ".to_string();
    let mut negative = sample_tweet("3");
    negative.sentiment.sentences[1].confidence_scores.negative = -0.5;

    for bad in [blank_id, negative] {
        let batch = vec![sample_tweet("1"), bad];
        let (status, body) = app.post("/sentiment", &data_envelope(&batch)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_FAILED");
    }
    assert!(app.store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_get_structured_errors() -> TestResult {
    let app = TestApp::new();

    let mut negative_offset = serde_json::to_value(sample_tweet("1"))?;
    negative_offset["sentiment"]["sentences"][0]["offset"] = json!(-1);

    for body in [
        json!({ "tweets": [] }),
        json!({ "data": [{ "id": "1" }] }),
        json!({ "data": [negative_offset] }),
        json!([]),
    ] {
        let (status, response) = app.post("/sentiment", &body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response["code"], "INVALID_INPUT", "body {}", body);
    }

    let (status, response) = send(
        &app.router,
        test_support::post_request("/sentiment", "{not json")?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_INPUT");
    Ok(())
}

// ============================================================================
// GET /last-known-tweet
// ============================================================================

#[tokio::test]
async fn latest_id_on_empty_store_is_not_found() -> TestResult {
    let app = TestApp::new();
    let (status, body) = app.get("/last-known-tweet").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "data": { "id": "" } }));
    Ok(())
}

#[tokio::test]
async fn latest_id_follows_configured_ordering() -> TestResult {
    for (ordering, ids, expected) in [
        (IdOrdering::Lexical, ["100", "099"], "100"),
        (IdOrdering::Numeric, ["100", "099"], "100"),
        (IdOrdering::Lexical, ["99", "100"], "99"),
        (IdOrdering::Numeric, ["99", "100"], "100"),
    ] {
        let app = TestApp::with_policy(CachePolicy::default(), ordering);
        app.post("/sentiment", &data_envelope(&sample_tweets(&ids))).await?;

        let (status, body) = app.get("/last-known-tweet").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "data": { "id": expected } }), "{} {:?}", ordering, ids);
    }
    Ok(())
}

#[tokio::test]
async fn latest_id_ignores_cache() -> TestResult {
    let app = TestApp::new();
    app.cache
        .insert_raw(
            TWEETS_CACHE_KEY,
            &serde_json::to_string(&[sample_tweet("cached")])?,
            DAY,
        )
        .await;

    let (status, _) = app.get("/last-known-tweet").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

// ============================================================================
// OPERATIONS
// ============================================================================

#[tokio::test]
async fn readiness_reflects_backends() -> TestResult {
    let app = TestApp::new();
    let (status, body) = app.get("/health/ready").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let degraded = router_over(
        Arc::new(InMemoryStore::new()),
        Arc::new(FailingCache::new()),
        CachePolicy::default(),
        IdOrdering::default(),
    );
    let (status, body) = send(&degraded, get_request("/health/ready")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["details"]["cache"]["status"], "unhealthy");

    let down = router_over(
        Arc::new(FailingStore::new(InMemoryStore::new()).fail_ping()),
        Arc::new(InMemoryCache::new()),
        CachePolicy::default(),
        IdOrdering::default(),
    );
    let (status, body) = send(&down, get_request("/health/ready")?).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    Ok(())
}

#[tokio::test]
async fn liveness_and_ping() -> TestResult {
    let app = TestApp::new();
    let (status, body) = app.get("/health/live").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, text) = send_text(&app.router, get_request("/health/ping")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "pong");
    Ok(())
}

#[tokio::test]
async fn metrics_are_exposed_after_traffic() -> TestResult {
    let app = TestApp::new();
    app.get("/sentiment").await?;

    let (status, text) = send_text(&app.router, get_request("/metrics")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("tweetsense_http_requests_total"));
    assert!(text.contains("/sentiment"));
    assert!(text.contains("tweetsense_cache_lookups_total"));
    Ok(())
}
