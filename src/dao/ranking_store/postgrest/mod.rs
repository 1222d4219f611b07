//! Ranking store talking to a PostgREST endpoint (e.g. a Supabase project's `rest/v1` API).

mod config;
mod error;
mod models;
mod store;

pub use config::PostgrestConfig;
pub use error::PostgrestDaoError;
pub use store::PostgrestRankingStore;

use crate::dao::storage::StorageError;

impl From<PostgrestDaoError> for StorageError {
    fn from(err: PostgrestDaoError) -> Self {
        match err {
            PostgrestDaoError::InvalidRow { message } => StorageError::invalid_record(message),
            other => StorageError::unavailable("postgrest", other),
        }
    }
}
