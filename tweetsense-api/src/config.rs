//! Service Configuration Module
//!
//! Configuration is read from environment variables once at startup. The
//! document store endpoint and key and the cache URL are required; the
//! process refuses to start without them. Everything else has a default.

use secrecy::SecretString;
use std::net::{Ipv6Addr, SocketAddr};
use std::time::Duration;
use tweetsense_core::{ConfigError, IdOrdering};
use tweetsense_storage::CosmosConfig;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3100;

/// Default lifetime of the cached tweet list (24 hours).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

// ============================================================================
// CACHE POLICY
// ============================================================================

/// How the tweet list cache is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Lifetime of a cached list.
    pub ttl: Duration,
    /// Drop the cached list after every successful write batch. Off by
    /// default, in which case reads may lag writes by up to `ttl`.
    pub invalidate_on_write: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            invalidate_on_write: false,
        }
    }
}

// ============================================================================
// SERVICE CONFIGURATION
// ============================================================================

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub cosmos: CosmosConfig,
    /// Cache connection URL. May carry a password, so it is never logged.
    pub redis_url: SecretString,
    pub cache_policy: CachePolicy,
    pub id_ordering: IdOrdering,
    /// Deployment environment name, attached to startup logs.
    pub environment: String,
}

impl ServiceConfig {
    /// Create ServiceConfig from environment variables.
    ///
    /// Environment variables:
    /// - `COSMOS_ENDPOINT` (required): document store endpoint URL
    /// - `COSMOS_KEY` (required): document store master key
    /// - `REDIS_URL` (required): cache connection URL
    /// - `PORT`: listen port (default: 3100)
    /// - `COSMOS_DATABASE`: database id (default: sentiment)
    /// - `COSMOS_CONTAINER`: container id (default: tweets)
    /// - `COSMOS_PARTITION_KEY`: partition key path (default: /type)
    /// - `TWEET_CACHE_TTL_SECS`: cache lifetime in seconds (default: 86400)
    /// - `TWEET_CACHE_INVALIDATE_ON_WRITE`: "true" or "false" (default: false)
    /// - `TWEET_ID_ORDERING`: "lexical" or "numeric" (default: lexical)
    /// - `TWEETSENSE_ENVIRONMENT`: environment name (default: development)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let endpoint = get("COSMOS_ENDPOINT");
        let key = get("COSMOS_KEY");
        let redis_url = get("REDIS_URL");

        let missing: Vec<&str> = [
            ("COSMOS_ENDPOINT", endpoint.is_none()),
            ("COSMOS_KEY", key.is_none()),
            ("REDIS_URL", redis_url.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name)
        .collect();

        let (Some(endpoint), Some(key), Some(redis_url)) = (endpoint, key, redis_url) else {
            return Err(ConfigError::MissingRequired {
                field: missing.join(", "),
            });
        };

        let port = match get("PORT") {
            Some(value) => parse_field("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        let mut cosmos = CosmosConfig::new(endpoint, key);
        if let Some(database) = get("COSMOS_DATABASE") {
            cosmos.database = database;
        }
        if let Some(container) = get("COSMOS_CONTAINER") {
            cosmos.container = container;
        }
        if let Some(path) = get("COSMOS_PARTITION_KEY") {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: "COSMOS_PARTITION_KEY".to_string(),
                    value: path,
                    reason: "partition key path must start with '/'".to_string(),
                });
            }
            cosmos.partition_key_path = path;
        }

        let mut cache_policy = CachePolicy::default();
        if let Some(value) = get("TWEET_CACHE_TTL_SECS") {
            let secs: u64 = parse_field("TWEET_CACHE_TTL_SECS", &value)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "TWEET_CACHE_TTL_SECS".to_string(),
                    value,
                    reason: "ttl must be at least one second".to_string(),
                });
            }
            cache_policy.ttl = Duration::from_secs(secs);
        }
        if let Some(value) = get("TWEET_CACHE_INVALIDATE_ON_WRITE") {
            cache_policy.invalidate_on_write = parse_bool("TWEET_CACHE_INVALIDATE_ON_WRITE", &value)?;
        }

        let id_ordering = match get("TWEET_ID_ORDERING") {
            Some(value) => value.parse()?,
            None => IdOrdering::default(),
        };

        let environment =
            get("TWEETSENSE_ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            port,
            cosmos,
            redis_url: SecretString::new(redis_url.into()),
            cache_policy,
            id_ordering,
            environment,
        })
    }

    /// Dual-stack wildcard address on the configured port.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, self.port))
    }
}

fn parse_field<T>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
