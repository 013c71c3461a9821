use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::core::filters::apply_filter;
use crate::models::{Profile, ProfileFilter, ProfilePage};
use crate::services::postgres::PostgresError;
use crate::services::supabase::SupabaseError;

/// Errors surfaced by any profile repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] PostgresError),

    #[error("Failed to load profiles: {0}")]
    Load(String),
}

/// Source of profiles for matching and search
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch one profile by id, `None` if it does not exist
    async fn resolve(&self, id: &str) -> Result<Option<Profile>, RepositoryError>;

    /// Fetch every profile except the one with `excluding_id`
    async fn list_others(&self, excluding_id: &str) -> Result<Vec<Profile>, RepositoryError>;

    /// Search profiles, returning one page plus the total match count
    ///
    /// `count` is the number of profiles matching the filter regardless of
    /// paging, also when the requested page lies past the last match.
    async fn search(&self, filter: &ProfileFilter) -> Result<ProfilePage, RepositoryError>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> bool {
        true
    }
}

/// Profiles held in memory
///
/// Backs tests and local runs without a database. Profiles keep their
/// insertion order, which is the order `list_others` returns them in.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Vec<Profile>,
}

impl InMemoryProfileRepository {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// Load profiles from a JSON array file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RepositoryError::Load(format!("{}: {}", path.display(), e)))?;
        let profiles: Vec<Profile> = serde_json::from_str(&raw)
            .map_err(|e| RepositoryError::Load(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded {} profiles from {}", profiles.len(), path.display());

        Ok(Self::new(profiles))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn resolve(&self, id: &str) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn list_others(&self, excluding_id: &str) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.id != excluding_id)
            .cloned()
            .collect())
    }

    async fn search(&self, filter: &ProfileFilter) -> Result<ProfilePage, RepositoryError> {
        Ok(apply_filter(&self.profiles, filter))
    }
}
