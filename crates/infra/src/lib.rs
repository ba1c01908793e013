//! Infrastructure layer: configuration, in-memory and Postgres stores.

pub mod config;
pub mod memory;
pub mod postgres;

pub use config::{AppConfig, ConfigError, StorageBackend};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
