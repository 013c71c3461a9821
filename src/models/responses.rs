use serde::Serialize;
use crate::models::domain::{MatchScore, Profile};

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchScore>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the profile search endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSearchResponse {
    pub profiles: Vec<Profile>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
