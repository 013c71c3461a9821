//! CoListr Match - partner matching service for the CoListr platform
//!
//! This library scores how well two real-estate professionals complement each
//! other and ranks a candidate pool for one user. Profiles come from a
//! pluggable repository: the hosted REST backend, PostgreSQL, or memory.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{calculate_match_score, MatchResult, Matcher, DEFAULT_MATCH_LIMIT};
pub use models::{FindMatchesRequest, FindMatchesResponse, MatchScore, Profile, ProfileFilter, ProfilePage};
pub use services::{MatchError, MatchService, ProfileRepository};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let (score, reasons) = calculate_match_score(&Profile::new("a"), &Profile::new("b"));
        assert_eq!(score, 0);
        assert!(reasons.is_empty());
        assert_eq!(DEFAULT_MATCH_LIMIT, 10);
    }
}
