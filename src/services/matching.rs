use std::sync::Arc;
use thiserror::Error;

use crate::core::{MatchResult, Matcher};
use crate::services::repository::{ProfileRepository, RepositoryError};

/// Errors returned by [`MatchService::find_matches`]
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("User profile not found: {0}")]
    ProfileNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Finds partner matches for a user id
///
/// Resolves the acting profile and the candidate pool through the injected
/// repository, then hands both to the [`Matcher`].
#[derive(Clone)]
pub struct MatchService {
    repository: Arc<dyn ProfileRepository>,
    matcher: Matcher,
}

impl MatchService {
    pub fn new(repository: Arc<dyn ProfileRepository>, matcher: Matcher) -> Self {
        Self { repository, matcher }
    }

    pub fn repository(&self) -> &Arc<dyn ProfileRepository> {
        &self.repository
    }

    /// Find up to `limit` matches for `user_id`, best first
    ///
    /// Fails with [`MatchError::ProfileNotFound`] when the user has no
    /// profile; nothing is scored in that case.
    pub async fn find_matches(&self, user_id: &str, limit: usize) -> Result<MatchResult, MatchError> {
        let user_profile = self
            .repository
            .resolve(user_id)
            .await?
            .ok_or_else(|| MatchError::ProfileNotFound(user_id.to_string()))?;

        let candidates = self.repository.list_others(user_id).await?;

        tracing::debug!("Scoring {} candidates for {}", candidates.len(), user_id);

        Ok(self.matcher.find_matches(&user_profile, candidates, limit))
    }
}
