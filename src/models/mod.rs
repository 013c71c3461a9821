// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchScore, Profile, ProfileFilter, ProfilePage, DEFAULT_PAGE_SIZE};
pub use requests::{FindMatchesRequest, ProfileSearchQuery};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, ProfileSearchResponse};
