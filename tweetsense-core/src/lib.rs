//! TWEETSENSE Core - Record Model and Shared Types
//!
//! Pure data definitions shared by the storage and API crates: the
//! sentiment-scored tweet record, the store document codec, the id ordering
//! policy used for "latest tweet" lookups, and the error taxonomy.

pub mod error;
pub mod model;
pub mod ordering;

pub use error::{
    CacheError, CacheResult, ConfigError, DecodeError, StoreError, StoreResult, ValidationError,
};
pub use model::{
    ConfidenceScores, Sentence, Sentiment, Tweet, TweetDocument, DISCRIMINATOR_FIELD, TWEET_KIND,
};
pub use ordering::IdOrdering;
