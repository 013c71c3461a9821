use serde::{Deserialize, Serialize};

/// A real-estate professional's profile, as stored in the `profiles` table
///
/// Only `location`, `specialties`, `experience`, `investment_capacity` and
/// `role` take part in scoring. The remaining columns are carried through so
/// callers can render the match without a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub experience: Option<i32>,
    #[serde(default)]
    pub investment_capacity: Option<String>,
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Profile {
    /// Bare profile with only an id, every optional attribute unset
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: None,
            avatar_url: None,
            role: None,
            location: None,
            bio: None,
            experience: None,
            investment_capacity: None,
            specialties: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Scored match result for one candidate
#[derive(Debug, Clone, Serialize)]
pub struct MatchScore {
    pub profile: Profile,
    pub score: u8,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
}

/// Profile search criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    /// Case-insensitive substring of full name or bio
    pub search: Option<String>,
    /// Case-insensitive substring of location
    pub location: Option<String>,
    /// Matches profiles sharing at least one tag
    pub specialties: Vec<String>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub investment_capacity: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Page size used when an offset is given without a limit
pub const DEFAULT_PAGE_SIZE: usize = 10;

impl ProfileFilter {
    /// Resolve paging into `(offset, limit)`
    ///
    /// Returns `None` when the filter asks for every row.
    pub fn page(&self) -> Option<(usize, usize)> {
        match (self.offset, self.limit) {
            (Some(offset), limit) => Some((offset, limit.unwrap_or(DEFAULT_PAGE_SIZE))),
            (None, Some(limit)) => Some((0, limit)),
            (None, None) => None,
        }
    }
}

/// One page of profiles plus the total number of matching rows
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub profiles: Vec<Profile>,
    pub count: usize,
}
