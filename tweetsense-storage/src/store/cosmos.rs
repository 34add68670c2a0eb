//! Azure Cosmos DB (SQL API) document store.
//!
//! Talks to the REST gateway directly: every request is signed with the
//! account master key (HMAC-SHA256 over verb, resource type, resource link
//! and date), queries are parameterized SQL and follow continuation tokens,
//! and writes use the upsert header so a document is created or replaced by
//! its `id`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use sha2::Sha256;
use std::time::Duration;
use tweetsense_core::{StoreError, StoreResult, DISCRIMINATOR_FIELD};

use super::{DocumentQuery, DocumentStore};

type HmacSha256 = Hmac<Sha256>;

/// REST API version sent with every request.
const API_VERSION: &str = "2018-12-31";

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Connection settings for a Cosmos DB container.
#[derive(Debug, Clone)]
pub struct CosmosConfig {
    /// Account endpoint, e.g. `https://myaccount.documents.azure.com:443/`
    pub endpoint: String,
    /// Base64 master key. Never logged.
    pub key: SecretString,
    pub database: String,
    pub container: String,
    /// Partition key path of the container, e.g. `/type`.
    pub partition_key_path: String,
    pub connect_timeout: Duration,
}

impl CosmosConfig {
    pub const DEFAULT_DATABASE: &'static str = "sentiment";
    pub const DEFAULT_CONTAINER: &'static str = "tweets";
    pub const DEFAULT_PARTITION_KEY_PATH: &'static str = "/type";

    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        let key: String = key.into();
        Self {
            endpoint: endpoint.into(),
            key: SecretString::new(key.into()),
            database: Self::DEFAULT_DATABASE.to_string(),
            container: Self::DEFAULT_CONTAINER.to_string(),
            partition_key_path: Self::DEFAULT_PARTITION_KEY_PATH.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Resource link of the container: `dbs/{db}/colls/{coll}`.
    pub fn collection_link(&self) -> String {
        format!("dbs/{}/colls/{}", self.database, self.container)
    }

    /// Whether the container is partitioned by the discriminator, which lets
    /// kind-filtered queries run against a single partition.
    fn partitioned_by_kind(&self) -> bool {
        self.partition_key_path.trim_start_matches('/') == DISCRIMINATOR_FIELD
    }
}

// ============================================================================
// REQUEST SIGNING
// ============================================================================

/// Build the `authorization` header value for a master-key signed request.
///
/// `date` must be the exact RFC 1123 string sent as `x-ms-date`.
pub fn master_key_token(
    key: &str,
    verb: &Method,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> StoreResult<String> {
    let key_bytes = STANDARD.decode(key).map_err(|e| StoreError::Auth {
        reason: format!("master key is not valid base64: {}", e),
    })?;

    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.as_str().to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );

    let mut mac = HmacSha256::new_from_slice(&key_bytes).map_err(|e| StoreError::Auth {
        reason: format!("master key rejected: {}", e),
    })?;
    mac.update(payload.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    let token = format!("type=master&ver=1.0&sig={}", signature);
    Ok(urlencoding::encode(&token).into_owned())
}

fn rfc1123_now() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

// ============================================================================
// CLIENT
// ============================================================================

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(rename = "Documents", default)]
    documents: Vec<JsonValue>,
}

/// Document store backed by a Cosmos DB container.
#[derive(Clone)]
pub struct CosmosStore {
    config: CosmosConfig,
    http: reqwest::Client,
}

impl CosmosStore {
    /// Build a client for the configured container.
    pub fn new(config: CosmosConfig) -> StoreResult<Self> {
        // Reject an unusable key at construction.
        STANDARD
            .decode(config.key.expose_secret())
            .map_err(|e| StoreError::Auth {
                reason: format!("master key is not valid base64: {}", e),
            })?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| StoreError::Request {
                operation: "connect".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &CosmosConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn signed(
        &self,
        method: Method,
        path: &str,
        resource_type: &str,
        resource_link: &str,
    ) -> StoreResult<reqwest::RequestBuilder> {
        let date = rfc1123_now();
        let token = master_key_token(
            self.config.key.expose_secret(),
            &method,
            resource_type,
            resource_link,
            &date,
        )?;

        Ok(self
            .http
            .request(method, self.url(path))
            .header("authorization", token)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION))
    }

    /// Partition key header value for a document, read from the configured path.
    fn partition_key_of(&self, document: &JsonValue) -> StoreResult<String> {
        let value = document
            .pointer(&self.config.partition_key_path)
            .ok_or_else(|| StoreError::Request {
                operation: "upsert".to_string(),
                reason: format!(
                    "document has no value at partition key path {}",
                    self.config.partition_key_path
                ),
            })?;
        Ok(json!([value]).to_string())
    }
}

async fn check_status(operation: &str, response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Auth {
            reason: format!("{} rejected with {}: {}", operation, status.as_u16(), message),
        }),
        _ => Err(StoreError::Status {
            operation: operation.to_string(),
            status: status.as_u16(),
            message,
        }),
    }
}

fn request_error(operation: &str, err: reqwest::Error) -> StoreError {
    StoreError::Request {
        operation: operation.to_string(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl DocumentStore for CosmosStore {
    async fn query(&self, query: &DocumentQuery) -> StoreResult<Vec<JsonValue>> {
        let link = self.config.collection_link();
        let path = format!("{}/docs", link);
        let body = json!({
            "query": query.to_sql(),
            "parameters": [{ "name": "@kind", "value": query.kind }],
        });

        let mut documents = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .signed(Method::POST, &path, "docs", &link)?
                .header("content-type", "application/query+json")
                .header("x-ms-documentdb-isquery", "True");

            request = if self.config.partitioned_by_kind() {
                request.header("x-ms-documentdb-partitionkey", json!([query.kind]).to_string())
            } else {
                request.header("x-ms-documentdb-query-enablecrosspartition", "True")
            };

            if let Some(token) = &continuation {
                request = request.header("x-ms-continuation", token.as_str());
            }

            let response = request
                .body(body.to_string())
                .send()
                .await
                .map_err(|e| request_error("query", e))?;
            let response = check_status("query", response).await?;

            continuation = response
                .headers()
                .get("x-ms-continuation")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let page: QueryPage = response
                .json()
                .await
                .map_err(|e| request_error("query", e))?;
            documents.extend(page.documents);

            let done = continuation.is_none()
                || query.limit.is_some_and(|limit| documents.len() >= limit);
            if done {
                break;
            }
        }

        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }

        tracing::debug!(
            kind = %query.kind,
            count = documents.len(),
            "Cosmos query completed"
        );
        Ok(documents)
    }

    async fn upsert(&self, document: JsonValue) -> StoreResult<()> {
        let link = self.config.collection_link();
        let path = format!("{}/docs", link);
        let partition_key = self.partition_key_of(&document)?;

        let response = self
            .signed(Method::POST, &path, "docs", &link)?
            .header("content-type", "application/json")
            .header("x-ms-documentdb-is-upsert", "True")
            .header("x-ms-documentdb-partitionkey", partition_key)
            .json(&document)
            .send()
            .await
            .map_err(|e| request_error("upsert", e))?;
        check_status("upsert", response).await?;

        tracing::debug!(
            id = document.get("id").and_then(JsonValue::as_str).unwrap_or_default(),
            "Cosmos upsert completed"
        );
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let link = self.config.collection_link();
        let response = self
            .signed(Method::GET, &link, "colls", &link)?
            .send()
            .await
            .map_err(|e| request_error("ping", e))?;
        check_status("ping", response).await?;
        Ok(())
    }

    /// Cross-partition `TOP`/`ORDER BY` needs a query plan the REST gateway
    /// does not provide, so only single-partition queries are ordered here.
    fn supports_ordered_queries(&self) -> bool {
        self.config.partitioned_by_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "dHdlZXRzZW5zZS10ZXN0LW1hc3Rlci1rZXk=";

    #[test]
    fn test_master_key_token_known_vector() -> StoreResult<()> {
        let token = master_key_token(
            TEST_KEY,
            &Method::POST,
            "docs",
            "dbs/sentiment/colls/tweets",
            "Tue, 01 Oct 2024 12:00:00 GMT",
        )?;
        assert_eq!(
            token,
            "type%3Dmaster%26ver%3D1.0%26sig%3DhYoRscxA7hwAvvpOe5PGrg9h1usRO2JjO3r0%2F89lzsA%3D"
        );
        Ok(())
    }

    #[test]
    fn test_master_key_token_rejects_bad_key() {
        let result = master_key_token("not base64!", &Method::GET, "colls", "dbs/a/colls/b", "x");
        assert!(matches!(result, Err(StoreError::Auth { .. })));
    }

    #[test]
    fn test_new_rejects_bad_key() {
        let config = CosmosConfig::new("https://localhost:8081", "%%%");
        assert!(matches!(CosmosStore::new(config), Err(StoreError::Auth { .. })));
    }

    #[test]
    fn test_collection_link_and_url() -> StoreResult<()> {
        let mut config = CosmosConfig::new("https://acct.documents.azure.com:443/", TEST_KEY);
        config.database = "db1".to_string();
        config.container = "c1".to_string();
        assert_eq!(config.collection_link(), "dbs/db1/colls/c1");

        let store = CosmosStore::new(config)?;
        assert_eq!(
            store.url("dbs/db1/colls/c1/docs"),
            "https://acct.documents.azure.com:443/dbs/db1/colls/c1/docs"
        );
        Ok(())
    }

    #[test]
    fn test_partition_key_from_path() -> StoreResult<()> {
        let store = CosmosStore::new(CosmosConfig::new("https://localhost:8081", TEST_KEY))?;
        let document = json!({ "id": "1", "type": "tweet" });
        assert_eq!(store.partition_key_of(&document)?, "[\"tweet\"]");

        let mut config = CosmosConfig::new("https://localhost:8081", TEST_KEY);
        config.partition_key_path = "/id".to_string();
        let store = CosmosStore::new(config)?;
        assert_eq!(store.partition_key_of(&document)?, "[\"1\"]");
        assert!(!store.config().partitioned_by_kind());
        assert!(!store.supports_ordered_queries());
        Ok(())
    }

    #[test]
    fn test_partition_key_missing() -> StoreResult<()> {
        let mut config = CosmosConfig::new("https://localhost:8081", TEST_KEY);
        config.partition_key_path = "/tenant".to_string();
        let store = CosmosStore::new(config)?;
        let result = store.partition_key_of(&json!({ "id": "1" }));
        assert!(matches!(result, Err(StoreError::Request { .. })));
        Ok(())
    }

    #[test]
    fn test_rfc1123_shape() {
        let date = rfc1123_now();
        assert!(date.ends_with(" GMT"));
        assert_eq!(date.len(), "Tue, 01 Oct 2024 12:00:00 GMT".len());
    }
}
