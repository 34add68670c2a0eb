//! Request and response bodies.
//!
//! Every payload is wrapped in a `data` envelope; tweet records themselves
//! come from `tweetsense_core`.

use serde::{Deserialize, Serialize};

/// `{ "data": ... }` wrapper used by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Body of the latest-tweet response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetIdBody {
    /// Empty when no tweet is stored.
    pub id: String,
}

/// Empty JSON object returned by successful writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Acknowledgement {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledgement_is_empty_object() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&Acknowledgement {})?, "{}");
        Ok(())
    }

    #[test]
    fn test_envelope_shape() -> Result<(), serde_json::Error> {
        let body = DataEnvelope::new(TweetIdBody { id: "42".to_string() });
        assert_eq!(serde_json::to_value(&body)?, serde_json::json!({ "data": { "id": "42" } }));
        Ok(())
    }
}
