/// Database model definitions.
pub mod models;
/// Ranking table storage backends.
pub mod ranking_store;
/// Storage abstraction layer for database operations.
pub mod storage;
