//! Error types for tweetsense operations

use thiserror::Error;

/// A stored document that could not be decoded into a tweet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Undecodable tweet document{}: {reason}", describe_id(.id))]
pub struct DecodeError {
    pub id: Option<String>,
    pub reason: String,
}

fn describe_id(id: &Option<String>) -> String {
    id.as_deref()
        .map(|id| format!(" '{}'", id))
        .unwrap_or_default()
}

/// Document store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store request '{operation}' failed: {reason}")]
    Request { operation: String, reason: String },

    #[error("Store request '{operation}' returned status {status}: {message}")]
    Status {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Store authentication failed: {reason}")]
    Auth { reason: String },

    #[error("Store format error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Cache store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {reason}")]
    Connection { reason: String },

    #[error("Cache command '{command}' failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Cache payload could not be serialized: {reason}")]
    Serialization { reason: String },
}

/// Request validation errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Tweet id must not be empty")]
    EmptyId,

    #[error("Invalid confidence score for {field}: {value} (must be finite and non-negative)")]
    InvalidScore { field: String, value: f64 },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration value: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Result type alias for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for cache store operations.
pub type CacheResult<T> = Result<T, CacheError>;

// =============================================================================
// TESTS
// =============================================================================
