//! Gateways the services talk to.
//!
//! The services never see raw documents or cache payloads: the store
//! gateway hands out decoded [`Tweet`](tweetsense_core::Tweet)s and the
//! cache gateway owns the single whole-list cache entry.

pub mod cache;
pub mod store;

pub use cache::{CacheGateway, CacheLookup, TWEETS_CACHE_KEY};
pub use store::StoreGateway;
