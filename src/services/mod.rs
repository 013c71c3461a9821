// Service exports
pub mod cache;
pub mod matching;
pub mod postgres;
pub mod repository;
pub mod supabase;

pub use cache::{CacheError, CacheKey, CacheManager, CachedProfileRepository};
pub use matching::{MatchError, MatchService};
pub use postgres::{PostgresClient, PostgresError};
pub use repository::{InMemoryProfileRepository, ProfileRepository, RepositoryError};
pub use supabase::{SupabaseClient, SupabaseError};
