use std::path::PathBuf;

use crate::application::todo_storage::DEFAULT_STORAGE_KEY;

const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
const DEFAULT_LOG_FILE: &str = "todos.log";
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings, read from the environment (and `.env`, when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub storage_key: String,
    pub log_file: PathBuf,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str, default: &str| {
            lookup(name).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
        };
        Self {
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            storage_key: get("TODOS_STORAGE_KEY", DEFAULT_STORAGE_KEY),
            log_file: PathBuf::from(get("TODOS_LOG_FILE", DEFAULT_LOG_FILE)),
            log_filter: get("RUST_LOG", DEFAULT_LOG_FILTER),
        }
    }
}
