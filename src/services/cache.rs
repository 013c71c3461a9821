use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Profile, ProfileFilter, ProfilePage};
use crate::services::repository::{ProfileRepository, RepositoryError};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-process cache manager
///
/// Values are stored as JSON bytes in a `moka` cache weighed by their
/// length, so `max_bytes` bounds memory however large a candidate pool is.
pub struct CacheManager {
    cache: moka::future::Cache<String, Vec<u8>>,
}

impl CacheManager {
    /// Create a new cache manager holding at most `max_bytes` of values
    pub fn new(max_bytes: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_bytes)
            .weigher(|_key: &String, value: &Vec<u8>| -> u32 {
                u32::try_from(value.len()).unwrap_or(u32::MAX)
            })
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Get a value from cache
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.cache.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.cache.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a single profile
    pub fn profile(user_id: &str) -> String {
        format!("profile:{}", user_id)
    }

    /// Build a cache key for the candidate pool seen by a user
    pub fn candidates(user_id: &str) -> String {
        format!("candidates:{}", user_id)
    }
}

/// Repository decorator caching profile lookups and candidate pools
///
/// Search results are never cached; their keys would be unbounded.
pub struct CachedProfileRepository<R> {
    inner: R,
    cache: CacheManager,
}

impl<R: ProfileRepository> CachedProfileRepository<R> {
    pub fn new(inner: R, cache: CacheManager) -> Self {
        Self { inner, cache }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
    }
}

#[async_trait]
impl<R: ProfileRepository> ProfileRepository for CachedProfileRepository<R> {
    async fn resolve(&self, id: &str) -> Result<Option<Profile>, RepositoryError> {
        let key = CacheKey::profile(id);
        if let Ok(profile) = self.cache.get::<Profile>(&key).await {
            return Ok(Some(profile));
        }

        let profile = self.inner.resolve(id).await?;
        // Misses are not cached so a newly created profile shows up at once
        if let Some(profile) = &profile {
            self.store(&key, profile).await;
        }
        Ok(profile)
    }

    async fn list_others(&self, excluding_id: &str) -> Result<Vec<Profile>, RepositoryError> {
        let key = CacheKey::candidates(excluding_id);
        if let Ok(profiles) = self.cache.get::<Vec<Profile>>(&key).await {
            return Ok(profiles);
        }

        let profiles = self.inner.list_others(excluding_id).await?;
        self.store(&key, &profiles).await;
        Ok(profiles)
    }

    async fn search(&self, filter: &ProfileFilter) -> Result<ProfilePage, RepositoryError> {
        self.inner.search(filter).await
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }
}
