use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Profile, ProfileFilter, ProfilePage};
use crate::services::repository::{ProfileRepository, RepositoryError};

/// Errors that can occur when talking to the hosted backend
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for the hosted backend's REST (PostgREST) interface
///
/// Reads the `profiles` table:
/// - resolving a single profile by id
/// - listing every profile except one
/// - filtered, paged profile search
pub struct SupabaseClient {
    base_url: String,
    table: String,
    client: Client,
}

impl SupabaseClient {
    /// Create a new client
    ///
    /// `api_key` is sent both as the `apikey` header and as a bearer token,
    /// which is what the hosted gateway expects for service keys.
    pub fn new(
        base_url: String,
        api_key: &str,
        table: String,
        timeout: Duration,
    ) -> Result<Self, SupabaseError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| SupabaseError::ApiError("API key is not a valid header value".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| SupabaseError::ApiError("API key is not a valid header value".into()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url,
            table,
            client,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }

    /// Run a GET against the profiles table
    ///
    /// With `with_count`, asks for an exact total and returns it from the
    /// `Content-Range` header.
    async fn fetch(
        &self,
        params: &[(&str, String)],
        with_count: bool,
    ) -> Result<(Vec<Profile>, Option<usize>), SupabaseError> {
        let mut request = self.client.get(self.table_url()).query(params);
        if with_count {
            request = request.header("Prefer", "count=exact");
        }

        let response = request.send().await?;
        let status = response.status();

        let total = if with_count {
            response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_content_range_total)
        } else {
            None
        };

        // An offset past the last row is answered with 416 and `*/total`
        if status == StatusCode::RANGE_NOT_SATISFIABLE && total.is_some() {
            return Ok((Vec::new(), total));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Profile query failed: {} - {}", status, body);
            return Err(SupabaseError::ApiError(format!(
                "Failed to query {}: {}",
                self.table, status
            )));
        }

        let profiles: Vec<Profile> = response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse profiles: {}", e)))?;

        Ok((profiles, total))
    }

    /// Get a single profile by id
    pub async fn get_profile(&self, id: &str) -> Result<Option<Profile>, SupabaseError> {
        tracing::debug!("Fetching profile: {}", id);

        let params = [("select", "*".to_string()), ("id", format!("eq.{}", id))];
        let (profiles, _) = self.fetch(&params, false).await?;

        Ok(profiles.into_iter().next())
    }

    /// Get every profile except `excluding_id`
    pub async fn list_other_profiles(&self, excluding_id: &str) -> Result<Vec<Profile>, SupabaseError> {
        let params = [
            ("select", "*".to_string()),
            ("id", format!("neq.{}", excluding_id)),
        ];
        let (profiles, _) = self.fetch(&params, false).await?;

        tracing::debug!("Fetched {} candidate profiles", profiles.len());

        Ok(profiles)
    }

    /// Filtered, paged profile search
    pub async fn search_profiles(&self, filter: &ProfileFilter) -> Result<ProfilePage, SupabaseError> {
        let params = search_params(filter);
        let (profiles, total) = self.fetch(&params, true).await?;

        let count = total.unwrap_or(profiles.len());
        Ok(ProfilePage { profiles, count })
    }
}

/// Translate a search filter into PostgREST query parameters
pub fn search_params(filter: &ProfileFilter) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_string())];

    if let Some(search) = &filter.search {
        let pattern = quote(&format!("*{}*", search));
        params.push((
            "or",
            format!("(full_name.ilike.{},bio.ilike.{})", pattern, pattern),
        ));
    }

    if let Some(location) = &filter.location {
        params.push(("location", format!("ilike.*{}*", location)));
    }

    if !filter.specialties.is_empty() {
        let tags = filter
            .specialties
            .iter()
            .map(|tag| quote(tag))
            .collect::<Vec<_>>()
            .join(",");
        params.push(("specialties", format!("ov.{{{}}}", tags)));
    }

    if let Some(min) = filter.min_experience {
        params.push(("experience", format!("gte.{}", min)));
    }

    if let Some(max) = filter.max_experience {
        params.push(("experience", format!("lte.{}", max)));
    }

    if let Some(capacity) = &filter.investment_capacity {
        params.push(("investment_capacity", format!("eq.{}", capacity)));
    }

    if let Some((offset, limit)) = filter.page() {
        params.push(("limit", limit.to_string()));
        if offset > 0 {
            params.push(("offset", offset.to_string()));
        }
    }

    params
}

/// Double-quote a value for PostgREST logical/array syntax
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/0`
fn parse_content_range_total(range: &str) -> Option<usize> {
    range.rsplit_once('/')?.1.parse().ok()
}

#[async_trait]
impl ProfileRepository for SupabaseClient {
    async fn resolve(&self, id: &str) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.get_profile(id).await?)
    }

    async fn list_others(&self, excluding_id: &str) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self.list_other_profiles(excluding_id).await?)
    }

    async fn search(&self, filter: &ProfileFilter) -> Result<ProfilePage, RepositoryError> {
        Ok(self.search_profiles(filter).await?)
    }
}
