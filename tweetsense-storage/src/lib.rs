//! TWEETSENSE Storage - Backends and Gateways
//!
//! Two external collaborators sit behind traits so the services can be
//! exercised without a network:
//! - [`DocumentStore`]: schema-less JSON documents (Cosmos DB in production,
//!   [`InMemoryStore`] for tests)
//! - [`CacheStore`]: string values with expiry (Redis in production,
//!   [`InMemoryCache`] for tests)
//!
//! The [`StoreGateway`] and [`CacheGateway`] translate domain operations
//! into calls on those traits.

pub mod cache;
pub mod gateway;
pub mod store;

pub use cache::{CacheStore, InMemoryCache, RedisCache};
pub use gateway::{CacheGateway, CacheLookup, StoreGateway, TWEETS_CACHE_KEY};
pub use store::{CosmosConfig, CosmosStore, DocumentQuery, DocumentStore, InMemoryStore};
