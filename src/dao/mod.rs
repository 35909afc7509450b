/// Database model definitions.
pub mod models;
/// Player save storage backends.
pub mod save_store;
/// Storage abstraction layer for database operations.
pub mod storage;
