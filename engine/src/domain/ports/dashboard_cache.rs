//! Port for the dashboard snapshot cache.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::cache_key::CacheKey;

/// Errors raised by cache adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardCacheError {
    /// Cache backend is unavailable or timing out.
    #[error("dashboard cache backend failure: {message}")]
    Backend {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Serialisation of cached content failed.
    #[error("dashboard cache serialisation failed: {message}")]
    Serialization {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl DashboardCacheError {
    /// Helper for backend-level failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Helper for serialisation problems.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Port for the injected cache capability.
///
/// The engine only ever consumes this contract; it never owns cache
/// infrastructure or process-global cache state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardCache: Send + Sync {
    /// Read a cached value.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, DashboardCacheError>;

    /// Store a value under `key` for at most `ttl`.
    async fn put(
        &self,
        key: &CacheKey,
        value: &Value,
        ttl: Duration,
    ) -> Result<(), DashboardCacheError>;

    /// Drop the value under `key`, if any.
    async fn evict(&self, key: &CacheKey) -> Result<(), DashboardCacheError>;
}

/// Fixture cache that never hits. Useful for hosts running without a
/// cache tier and for tests that do not exercise caching.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDashboardCache;

#[async_trait]
impl DashboardCache for NoOpDashboardCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Value>, DashboardCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &CacheKey,
        _value: &Value,
        _ttl: Duration,
    ) -> Result<(), DashboardCacheError> {
        Ok(())
    }

    async fn evict(&self, _key: &CacheKey) -> Result<(), DashboardCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_cache_never_hits() {
        let cache = NoOpDashboardCache;
        let key = CacheKey::new("dashboard:any").expect("valid key");
        let value = serde_json::json!({"ecoScore": 30});

        cache
            .put(&key, &value, Duration::from_secs(60))
            .await
            .expect("put accepted");
        assert_eq!(cache.get(&key).await.expect("get"), None);
        cache.evict(&key).await.expect("evict accepted");
    }
}
