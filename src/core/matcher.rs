use crate::core::scoring::calculate_match_score;
use crate::models::{MatchScore, Profile};

/// Number of matches returned when the caller does not ask for a limit
pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<MatchScore>,
    /// Candidates scored, the user's own profile not included
    pub total_candidates: usize,
}

/// Ranks a candidate pool against one user's profile
///
/// # Pipeline Stages
/// 1. Drop the user's own profile from the pool
/// 2. Score every remaining candidate
/// 3. Sort by score, highest first
/// 4. Keep the first `limit` entries
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Find the best partner matches for a user
    ///
    /// Candidates are moved into the returned [`MatchScore`]s, so the
    /// profiles handed back are the ones that came in.
    ///
    /// # Arguments
    /// * `user` - The acting user's profile
    /// * `candidates` - Every other profile
    /// * `limit` - Maximum number of matches to return
    ///
    /// # Returns
    /// MatchResult with matches in descending score order. Equal scores keep
    /// their order from the pool.
    pub fn find_matches(
        &self,
        user: &Profile,
        candidates: Vec<Profile>,
        limit: usize,
    ) -> MatchResult {
        let mut scored_matches: Vec<MatchScore> = candidates
            .into_iter()
            // Stage 1: the repository already excludes the user; don't rely on it
            .filter(|profile| profile.id != user.id)
            // Stage 2: score
            .map(|profile| {
                let (score, match_reasons) = calculate_match_score(user, &profile);
                MatchScore {
                    profile,
                    score,
                    match_reasons,
                }
            })
            .collect();

        // Stage 3: `sort_by` is stable, ties keep pool order
        scored_matches.sort_by(|a, b| b.score.cmp(&a.score));

        let total_candidates = scored_matches.len();

        // Stage 4: limit results
        scored_matches.truncate(limit);

        tracing::trace!(
            user_id = %user.id,
            total_candidates,
            returned = scored_matches.len(),
            "ranked candidate pool"
        );

        MatchResult {
            matches: scored_matches,
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user() -> Profile {
        let mut profile = Profile::new("current_user");
        profile.location = Some("Miami, FL".to_string());
        profile.specialties = Some(vec!["Residential".to_string(), "Luxury".to_string()]);
        profile.experience = Some(4);
        profile.investment_capacity = Some("$250K - $500K".to_string());
        profile.role = Some("Realtor".to_string());
        profile
    }

    fn create_candidate(id: &str, location: Option<&str>, experience: Option<i32>) -> Profile {
        let mut profile = Profile::new(id);
        profile.location = location.map(str::to_string);
        profile.experience = experience;
        profile
    }

    #[test]
    fn test_find_matches_sorted_by_score() {
        let matcher = Matcher::new();
        let user = create_user();

        let candidates = vec![
            create_candidate("far", Some("Denver, CO"), None),          // 0
            create_candidate("same", Some("Miami, FL"), Some(20)),      // 20 + 15
            create_candidate("city", Some("Miami, TX"), None),          // 15
        ];

        let result = matcher.find_matches(&user, candidates, 10);

        let ids: Vec<&str> = result.matches.iter().map(|m| m.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["same", "city", "far"]);
        assert_eq!(result.matches[0].score, 35);
        assert_eq!(result.total_candidates, 3);
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::new();
        let user = create_user();

        let candidates: Vec<Profile> = (0..20)
            .map(|i| create_candidate(&i.to_string(), Some("Miami, FL"), Some(i)))
            .collect();

        let result = matcher.find_matches(&user, candidates, 5);

        assert_eq!(result.matches.len(), 5);
        assert_eq!(result.total_candidates, 20);
    }

    #[test]
    fn test_ties_keep_pool_order() {
        let matcher = Matcher::new();
        let user = create_user();

        let candidates = vec![
            create_candidate("first", Some("Miami, TX"), None),
            create_candidate("top", Some("Miami, FL"), None),
            create_candidate("second", Some("miami"), None),
            create_candidate("third", Some("Miami, GA"), None),
        ];

        let result = matcher.find_matches(&user, candidates, 10);

        let ids: Vec<&str> = result.matches.iter().map(|m| m.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_excludes_self() {
        let matcher = Matcher::new();
        let user = create_user();

        let candidates = vec![user.clone(), create_candidate("other", None, None)];

        let result = matcher.find_matches(&user, candidates, 10);

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].profile.id, "other");
        assert_eq!(result.total_candidates, 1);
    }

    #[test]
    fn test_zero_limit_and_empty_pool() {
        let matcher = Matcher::new();
        let user = create_user();

        let result = matcher.find_matches(&user, vec![create_candidate("x", None, None)], 0);
        assert!(result.matches.is_empty());

        let result = matcher.find_matches(&user, Vec::new(), 10);
        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 0);
    }
}
