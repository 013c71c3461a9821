use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::config::MatchingSettings;
use crate::models::{
    ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse, ProfileFilter,
    ProfileSearchQuery, ProfileSearchResponse,
};
use crate::services::{MatchError, MatchService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matches: MatchService,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/profiles", web::get().to(search_profiles));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.matches.repository().health_check().await;

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 10
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {}", errors);
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let user_id = &req.user_id;
    let limit = state.matching.effective_limit(req.limit);

    tracing::info!("Finding matches for user: {}, limit: {}", user_id, limit);

    match state.matches.find_matches(user_id, limit).await {
        Ok(result) => {
            tracing::info!(
                "Returning {} matches for user {} (from {} candidates)",
                result.matches.len(),
                user_id,
                result.total_candidates
            );

            HttpResponse::Ok().json(FindMatchesResponse {
                matches: result.matches,
                total_candidates: result.total_candidates,
            })
        }
        Err(MatchError::ProfileNotFound(id)) => {
            tracing::info!("No profile for user {}", id);
            error_response(
                actix_web::http::StatusCode::NOT_FOUND,
                "User profile not found",
                format!("No profile exists for user {}", id),
            )
        }
        Err(MatchError::Repository(e)) => {
            tracing::error!("Failed to load profiles for {}: {}", user_id, e);
            error_response(
                actix_web::http::StatusCode::BAD_GATEWAY,
                "Failed to load profiles",
                e.to_string(),
            )
        }
    }
}

/// Profile search endpoint
///
/// GET /api/v1/profiles?search=&location=&specialties=a,b&minExperience=&maxExperience=&investmentCapacity=&limit=&offset=
async fn search_profiles(
    state: web::Data<AppState>,
    query: web::Query<ProfileSearchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let filter = ProfileFilter::from(query.into_inner());

    match state.matches.repository().search(&filter).await {
        Ok(page) => {
            tracing::debug!("Profile search returned {} of {}", page.profiles.len(), page.count);
            HttpResponse::Ok().json(ProfileSearchResponse {
                profiles: page.profiles,
                count: page.count,
            })
        }
        Err(e) => {
            tracing::error!("Profile search failed: {}", e);
            error_response(
                actix_web::http::StatusCode::BAD_GATEWAY,
                "Failed to search profiles",
                e.to_string(),
            )
        }
    }
}
