use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Profile, ProfileFilter, ProfilePage};
use crate::services::repository::{ProfileRepository, RepositoryError};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

const PROFILE_COLUMNS: &str = "id::text AS id, full_name, avatar_url, role, location, bio, experience, \
     investment_capacity, specialties, created_at, updated_at";

/// PostgreSQL client reading the `profiles` table directly
///
/// An alternative to the REST client when the service runs next to the
/// database and can hold its own connection pool.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        if url.is_empty() {
            return Err(PostgresError::InvalidInput("database url is empty".into()));
        }

        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Get a single profile by id
    pub async fn get_profile(&self, id: &str) -> Result<Option<Profile>, PostgresError> {
        let query = format!("SELECT {} FROM profiles WHERE id::text = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    /// Get every profile except `excluding_id`
    pub async fn list_other_profiles(&self, excluding_id: &str) -> Result<Vec<Profile>, PostgresError> {
        let query = format!(
            "SELECT {} FROM profiles WHERE id::text <> $1 ORDER BY created_at",
            PROFILE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(excluding_id)
            .fetch_all(&self.pool)
            .await?;

        let profiles = rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} candidate profiles", profiles.len());

        Ok(profiles)
    }

    /// Filtered, paged profile search
    ///
    /// The total is computed with a window function so one round trip
    /// returns both the page and the count. A page past the end has no row
    /// to carry the window total, so the count is then queried separately.
    pub async fn search_profiles(&self, filter: &ProfileFilter) -> Result<ProfilePage, PostgresError> {
        let mut builder = search_query(filter);

        let rows = builder.build().fetch_all(&self.pool).await?;

        let count = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total_count")? as usize,
            None if filter.page().is_some() => {
                let mut counter = count_query(filter);
                let total = counter
                    .build_query_scalar::<i64>()
                    .fetch_one(&self.pool)
                    .await?;
                total as usize
            }
            None => 0,
        };
        let profiles = rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProfilePage { profiles, count })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Build the search statement for a filter
fn search_query(filter: &ProfileFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<'static, Postgres> = QueryBuilder::new(format!(
        "SELECT {}, COUNT(*) OVER() AS total_count FROM profiles WHERE TRUE",
        PROFILE_COLUMNS
    ));

    push_filter_conditions(&mut builder, filter);

    builder.push(" ORDER BY created_at");

    if let Some((offset, limit)) = filter.page() {
        builder
            .push(" LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset as i64);
    }

    builder
}

/// Build the total-count statement for a filter, ignoring paging
fn count_query(filter: &ProfileFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<'static, Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM profiles WHERE TRUE");

    push_filter_conditions(&mut builder, filter);

    builder
}

fn push_filter_conditions(builder: &mut QueryBuilder<'static, Postgres>, filter: &ProfileFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (full_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR bio ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(location) = &filter.location {
        builder
            .push(" AND location ILIKE ")
            .push_bind(format!("%{}%", location));
    }

    if !filter.specialties.is_empty() {
        builder
            .push(" AND specialties && ")
            .push_bind(filter.specialties.clone());
    }

    if let Some(min) = filter.min_experience {
        builder.push(" AND experience >= ").push_bind(min);
    }

    if let Some(max) = filter.max_experience {
        builder.push(" AND experience <= ").push_bind(max);
    }

    if let Some(capacity) = &filter.investment_capacity {
        builder
            .push(" AND investment_capacity = ")
            .push_bind(capacity.clone());
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: row.try_get::<String, _>("id")?,
        full_name: row.try_get("full_name")?,
        avatar_url: row.try_get("avatar_url")?,
        role: row.try_get("role")?,
        location: row.try_get("location")?,
        bio: row.try_get("bio")?,
        experience: row.try_get("experience")?,
        investment_capacity: row.try_get("investment_capacity")?,
        specialties: row.try_get("specialties")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProfileRepository for PostgresClient {
    async fn resolve(&self, id: &str) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.get_profile(id).await?)
    }

    async fn list_others(&self, excluding_id: &str) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self.list_other_profiles(excluding_id).await?)
    }

    async fn search(&self, filter: &ProfileFilter) -> Result<ProfilePage, RepositoryError> {
        Ok(self.search_profiles(filter).await?)
    }

    async fn health_check(&self) -> bool {
        match PostgresClient::health_check(self).await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("PostgreSQL health check failed: {}", e);
                false
            }
        }
    }
}
