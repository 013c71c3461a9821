use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::ProfileFilter;

/// Request to find partner matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Query string for the profile search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Comma-separated specialty tags
    #[serde(default)]
    pub specialties: Option<String>,
    #[serde(default, rename = "minExperience")]
    pub min_experience: Option<i32>,
    #[serde(default, rename = "maxExperience")]
    pub max_experience: Option<i32>,
    #[serde(default, rename = "investmentCapacity")]
    pub investment_capacity: Option<String>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl From<ProfileSearchQuery> for ProfileFilter {
    fn from(query: ProfileSearchQuery) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let specialties = query
            .specialties
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        ProfileFilter {
            search: non_empty(query.search),
            location: non_empty(query.location),
            specialties,
            min_experience: query.min_experience,
            max_experience: query.max_experience,
            investment_capacity: non_empty(query.investment_capacity),
            limit: query.limit,
            offset: query.offset,
        }
    }
}
