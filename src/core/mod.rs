// Core algorithm exports
pub mod categories;
pub mod filters;
pub mod location;
pub mod matcher;
pub mod scoring;

pub use categories::{capacity_index, role_group, CAPACITY_BRACKETS, ROLE_GROUPS};
pub use filters::{apply_filter, matches_filter};
pub use location::{compare_locations, LocationMatch};
pub use matcher::{MatchResult, Matcher, DEFAULT_MATCH_LIMIT};
pub use scoring::{calculate_match_score, MAX_SCORE};
