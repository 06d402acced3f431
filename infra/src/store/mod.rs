//! Redis-backed storage for verification secrets and rate-limit windows.

pub mod rate_limit;
pub mod redis_client;
pub mod redis_store;

pub use rate_limit::RedisRateLimiter;
pub use redis_client::RedisClient;
pub use redis_store::RedisSecretStore;
