//! Runtime configuration read from the process environment.

use std::env;

use tracing::{info, warn};

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3000;
/// Environment variable holding the MongoDB connection string.
const MONGO_URI_ENV: &str = "MONGO_URI";
/// Environment variable naming the MongoDB database.
const MONGO_DB_ENV: &str = "MONGO_DB";
/// Environment variable holding the listen port.
const PORT_ENV: &str = "PORT";
/// Environment variable selecting the storage backend.
const SAVE_STORE_ENV: &str = "SAVE_STORE";

/// Storage backend the server installs at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// MongoDB reached through `MONGO_URI`.
    Mongo,
    /// Process-local map, lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    pub port: u16,
    pub mongo_uri: String,
    pub mongo_db: Option<String>,
    pub backend: StoreBackend,
}

impl AppConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration through `lookup`, falling back to defaults for missing or invalid
    /// values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|err| {
                warn!(value = %raw, error = %err, "invalid PORT; falling back to default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let mongo_uri = lookup(MONGO_URI_ENV).unwrap_or_default();
        let mongo_db = lookup(MONGO_DB_ENV).filter(|name| !name.trim().is_empty());

        let backend = match lookup(SAVE_STORE_ENV).as_deref().map(str::trim) {
            None | Some("") | Some("mongodb") | Some("mongo") => StoreBackend::Mongo,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                warn!(value = %other, "unknown SAVE_STORE; using mongodb");
                StoreBackend::Mongo
            }
        };

        if backend == StoreBackend::Mongo && mongo_uri.is_empty() {
            warn!("MONGO_URI is empty; the server will run in degraded mode");
        }
        info!(port, backend = ?backend, "configuration loaded");

        Self {
            port,
            mongo_uri,
            mongo_db,
            backend,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
