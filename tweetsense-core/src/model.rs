//! Sentiment-scored tweet records
//!
//! The wire shape is camelCase JSON (`confidenceScores`). The same types are
//! used for the HTTP bodies, the cached list and the stored documents; the
//! only difference on the store side is the `type` discriminator, which
//! [`TweetDocument`] adds on encode and checks on decode.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{DecodeError, ValidationError};

/// Discriminator value identifying tweet records in a shared collection.
pub const TWEET_KIND: &str = "tweet";

/// Name of the discriminator field on stored documents.
pub const DISCRIMINATOR_FIELD: &str = "type";

/// Per-label confidence of a sentiment classification.
///
/// The three scores are not assumed to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl ConfidenceScores {
    pub fn new(positive: f64, neutral: f64, negative: f64) -> Self {
        Self {
            positive,
            neutral,
            negative,
        }
    }

    fn validate(&self, path: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("positive", self.positive),
            ("neutral", self.neutral),
            ("negative", self.negative),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidScore {
                    field: format!("{}.confidenceScores.{}", path, label),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A span of tweet text with its own classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub sentiment: String,
    pub confidence_scores: ConfidenceScores,
    /// Start position within the tweet text.
    pub offset: u32,
    pub length: u32,
    /// The substring itself, stored alongside offset/length.
    pub text: String,
}

/// Aggregate classification of a tweet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    pub sentiment: String,
    pub confidence_scores: ConfidenceScores,
    /// Sentences in original text order.
    pub sentences: Vec<Sentence>,
}

/// A tweet together with its pre-computed sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    /// Externally assigned id, also the sort key for "latest tweet".
    pub id: String,
    pub text: String,
    pub sentiment: Sentiment,
}

impl Tweet {
    /// Check the invariants the type system cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }

        self.sentiment.confidence_scores.validate("sentiment")?;
        for (index, sentence) in self.sentiment.sentences.iter().enumerate() {
            sentence
                .confidence_scores
                .validate(&format!("sentiment.sentences[{}]", index))?;
        }
        Ok(())
    }
}

/// Codec between [`Tweet`] and the raw document kept in the store.
///
/// Stored documents carry the `type` discriminator plus whatever system
/// fields the store adds; decoding ignores unknown fields but rejects
/// anything that does not yield a complete, well-typed tweet.
pub struct TweetDocument;

impl TweetDocument {
    /// Encode a tweet as a store document with the discriminator set.
    pub fn encode(tweet: &Tweet) -> Result<JsonValue, DecodeError> {
        let mut value = serde_json::to_value(tweet).map_err(|e| DecodeError {
            id: Some(tweet.id.clone()),
            reason: e.to_string(),
        })?;

        match value.as_object_mut() {
            Some(object) => {
                object.insert(
                    DISCRIMINATOR_FIELD.to_string(),
                    JsonValue::String(TWEET_KIND.to_string()),
                );
                Ok(value)
            }
            None => Err(DecodeError {
                id: Some(tweet.id.clone()),
                reason: "tweet did not serialize to an object".to_string(),
            }),
        }
    }

    /// Decode a raw store document into a tweet.
    pub fn decode(value: JsonValue) -> Result<Tweet, DecodeError> {
        let id = value
            .get("id")
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        match value.get(DISCRIMINATOR_FIELD).and_then(JsonValue::as_str) {
            Some(TWEET_KIND) => {}
            Some(other) => {
                return Err(DecodeError {
                    id,
                    reason: format!("unexpected record kind '{}'", other),
                })
            }
            None => {
                return Err(DecodeError {
                    id,
                    reason: format!("missing '{}' discriminator", DISCRIMINATOR_FIELD),
                })
            }
        }

        serde_json::from_value(value).map_err(|e| DecodeError {
            id,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tweet() -> Tweet {
        Tweet {
            id: "1600000000000000001".to_string(),
            text: "Great launch. Servers are slow.".to_string(),
            sentiment: Sentiment {
                sentiment: "mixed".to_string(),
                confidence_scores: ConfidenceScores::new(0.45, 0.1, 0.45),
                sentences: vec![
                    Sentence {
                        sentiment: "positive".to_string(),
                        confidence_scores: ConfidenceScores::new(0.98, 0.01, 0.01),
                        offset: 0,
                        length: 13,
                        text: "Great launch.".to_string(),
                    },
                    Sentence {
                        sentiment: "negative".to_string(),
                        confidence_scores: ConfidenceScores::new(0.02, 0.08, 0.9),
                        offset: 14,
                        length: 17,
                        text: "Servers are slow.".to_string(),
                    },
                ],
            },
        }
    }

    #[test]
    fn test_wire_shape_is_camel_case() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(sample_tweet())?;
        assert!(value["sentiment"].get("confidenceScores").is_some());
        assert!(value["sentiment"]["sentences"][0]
            .get("confidenceScores")
            .is_some());
        assert!(value.get("type").is_none());
        Ok(())
    }

    #[test]
    fn test_encode_sets_discriminator() -> Result<(), DecodeError> {
        let document = TweetDocument::encode(&sample_tweet())?;
        assert_eq!(document["type"], json!("tweet"));
        assert_eq!(document["id"], json!("1600000000000000001"));
        Ok(())
    }

    #[test]
    fn test_decode_ignores_store_metadata() -> Result<(), DecodeError> {
        let mut document = TweetDocument::encode(&sample_tweet())?;
        document["_rid"] = json!("abc==");
        document["_ts"] = json!(1_700_000_000);
        document["_etag"] = json!("\"0000\"");

        let decoded = TweetDocument::decode(document)?;
        assert_eq!(decoded, sample_tweet());
        Ok(())
    }

    #[test]
    fn test_decode_rejects_other_kinds() {
        let document = json!({ "id": "7", "type": "user", "text": "", "sentiment": {} });
        let err = TweetDocument::decode(document).unwrap_err();
        assert_eq!(err.id.as_deref(), Some("7"));
        assert!(err.reason.contains("user"));
    }

    #[test]
    fn test_decode_rejects_missing_discriminator() {
        let document = serde_json::to_value(sample_tweet()).unwrap();
        let err = TweetDocument::decode(document).unwrap_err();
        assert!(err.reason.contains("discriminator"));
    }

    #[test]
    fn test_decode_rejects_misshaped_sentence() {
        let mut document = TweetDocument::encode(&sample_tweet()).unwrap();
        document["sentiment"]["sentences"][1]["offset"] = json!(-3);
        let err = TweetDocument::decode(document).unwrap_err();
        assert_eq!(err.id.as_deref(), Some("1600000000000000001"));
    }

    #[test]
    fn test_decode_accepts_integer_scores() -> Result<(), DecodeError> {
        let mut document = TweetDocument::encode(&sample_tweet())?;
        document["sentiment"]["confidenceScores"] =
            json!({ "positive": 1, "neutral": 0, "negative": 0 });
        let decoded = TweetDocument::decode(document)?;
        assert_eq!(
            decoded.sentiment.confidence_scores,
            ConfidenceScores::new(1.0, 0.0, 0.0)
        );
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(sample_tweet().validate().is_ok());

        let mut tweet = sample_tweet();
        tweet.id = "  ".to_string();
        assert_eq!(tweet.validate(), Err(ValidationError::EmptyId));

        let mut tweet = sample_tweet();
        tweet.sentiment.sentences[1].confidence_scores.negative = -0.5;
        match tweet.validate() {
            Err(ValidationError::InvalidScore { field, .. }) => {
                assert_eq!(field, "sentiment.sentences[1].confidenceScores.negative");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut tweet = sample_tweet();
        tweet.sentiment.confidence_scores.neutral = f64::NAN;
        assert!(tweet.validate().is_err());
    }
}
