use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use colistr_match::config::{CacheSettings, LoggingSettings, RepositoryBackend, Settings};
use colistr_match::core::Matcher;
use colistr_match::models::ErrorResponse;
use colistr_match::routes::{self, AppState};
use colistr_match::services::{
    CacheManager, CachedProfileRepository, InMemoryProfileRepository, MatchService,
    PostgresClient, ProfileRepository, RepositoryError, SupabaseClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error for malformed request payloads
#[derive(Debug)]
struct PayloadError(ErrorResponse);

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl error::ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

fn payload_error(error: &str, message: String) -> actix_web::Error {
    PayloadError(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
    .into()
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    payload_error("invalid_json", format!("Invalid JSON: {}", err))
}

/// Handle query payload errors
fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    payload_error("invalid_query", format!("Invalid query: {}", err))
}

/// Initialize logging; `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn with_cache<R>(repository: R, cache: &CacheSettings) -> Arc<dyn ProfileRepository>
where
    R: ProfileRepository + 'static,
{
    if !cache.enabled {
        let repository: Arc<dyn ProfileRepository> = Arc::new(repository);
        return repository;
    }

    info!("Profile cache enabled ({} bytes, TTL: {}s)", cache.max_bytes, cache.ttl_secs);
    let cached: Arc<dyn ProfileRepository> = Arc::new(CachedProfileRepository::new(
        repository,
        CacheManager::new(cache.max_bytes, cache.ttl_secs),
    ));
    cached
}

async fn build_repository(settings: &Settings) -> Result<Arc<dyn ProfileRepository>, RepositoryError> {
    match settings.repository.backend {
        RepositoryBackend::Supabase => {
            let supabase = &settings.supabase;
            let client = SupabaseClient::new(
                supabase.url.clone(),
                &supabase.api_key,
                supabase.profiles_table.clone(),
                Duration::from_secs(supabase.timeout_secs),
            )?;
            info!("Supabase client initialized for {}", supabase.url);
            Ok(with_cache(client, &settings.cache))
        }
        RepositoryBackend::Postgres => {
            let db = &settings.database;
            let client = PostgresClient::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await?;
            info!("PostgreSQL client initialized");
            Ok(with_cache(client, &settings.cache))
        }
        RepositoryBackend::Memory => {
            let repository = match &settings.repository.seed_path {
                Some(path) => InMemoryProfileRepository::from_json_file(path)?,
                None => InMemoryProfileRepository::default(),
            };
            info!("In-memory repository holds {} profiles", repository.len());
            // Already in memory; caching would only copy it
            let repository: Arc<dyn ProfileRepository> = Arc::new(repository);
            Ok(repository)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(format!("Configuration error: {}", e)));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting CoListr match service...");
    info!("Profile repository backend: {:?}", settings.repository.backend);

    let repository = build_repository(&settings).await.map_err(|e| {
        error!("Failed to initialize profile repository: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let app_state = AppState {
        matches: MatchService::new(repository, Matcher::new()),
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
