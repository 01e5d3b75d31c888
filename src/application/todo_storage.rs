use thiserror::Error;

use crate::domain::{kv_store::KeyValueStore, todo::Todo};

pub const DEFAULT_STORAGE_KEY: &str = "@todos";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failed: {0:#}")]
    Backend(anyhow::Error),
    #[error("stored todos are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result of a startup load. `failed` is set when the stored list could not
/// be read and `todos` fell back to empty.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub todos: Vec<Todo>,
    pub failed: bool,
}

/// Reads and writes the whole todo list as one JSON value under a fixed key.
pub struct TodoStorage<S: KeyValueStore> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> TodoStorage<S> {
    pub fn new(kv: S) -> Self { Self::with_key(kv, DEFAULT_STORAGE_KEY) }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self { Self { kv, key: key.into() } }

    pub fn key(&self) -> &str { &self.key }

    pub async fn try_load(&self) -> Result<Vec<Todo>, StorageError> {
        let Some(json) = self.kv.get(&self.key).await.map_err(StorageError::Backend)? else {
            return Ok(Vec::new());
        };
        let todos: Vec<Todo> = serde_json::from_str(&json)?;
        Ok(todos.into_iter().map(normalize).collect())
    }

    /// Loads the stored list, falling back to an empty one on any failure.
    pub async fn load(&self) -> LoadReport {
        match self.try_load().await {
            Ok(todos) => {
                tracing::info!(count = todos.len(), key = %self.key, "loaded todos");
                LoadReport { todos, failed: false }
            }
            Err(err) => {
                tracing::error!(error = %err, key = %self.key, "error loading todos");
                LoadReport { todos: Vec::new(), failed: true }
            }
        }
    }

    /// Writes the full list. Failures are logged and dropped.
    pub async fn save(&self, todos: &[Todo]) {
        let json = match serde_json::to_string(todos) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(error = %err, "error serializing todos");
                return;
            }
        };
        match self.kv.set(&self.key, &json).await {
            Ok(()) => tracing::debug!(count = todos.len(), key = %self.key, "saved todos"),
            Err(err) => tracing::error!(error = %format!("{err:#}"), key = %self.key, "error saving todos"),
        }
    }

    pub async fn clear_all(&self) {
        match self.kv.remove(&self.key).await {
            Ok(()) => tracing::info!(key = %self.key, "cleared stored todos"),
            Err(err) => tracing::error!(error = %format!("{err:#}"), key = %self.key, "error clearing todos"),
        }
    }
}

/// Drops a completion time stored on an open todo. A missing completion
/// time stays missing; no value is made up for it.
fn normalize(mut todo: Todo) -> Todo {
    match (todo.completed, todo.completed_at) {
        (false, Some(_)) => {
            tracing::warn!(id = %todo.id, "dropping completion time of open todo");
            todo.completed_at = None;
        }
        (true, None) => tracing::warn!(id = %todo.id, "completed todo has no completion time"),
        _ => {}
    }
    todo
}
