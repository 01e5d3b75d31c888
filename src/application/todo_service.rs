use crate::domain::{
    error::TodoError,
    kv_store::KeyValueStore,
    todo::{Filter, TodoId},
};

use super::{
    prompt::{Confirmation, Notice},
    save_queue::SaveQueue,
    todo_storage::TodoStorage,
    todo_store::TodoStore,
};

/// Owns the todo list for a session and persists it after every change.
///
/// All mutation goes through this type; the store it exposes is read-only.
pub struct TodoService {
    store: TodoStore,
    saves: SaveQueue,
}

impl TodoService {
    /// Loads the stored list and starts the save worker. The notice is set
    /// when loading failed and the session started from an empty list.
    pub async fn start<S: KeyValueStore>(storage: TodoStorage<S>) -> (Self, Option<Notice>) {
        let report = storage.load().await;
        let notice = report.failed.then_some(Notice::LoadFailed);
        let store = TodoStore::from_todos(report.todos);
        let saves = SaveQueue::spawn(storage);
        (Self { store, saves }, notice)
    }

    pub fn store(&self) -> &TodoStore { &self.store }

    pub fn set_filter(&mut self, filter: Filter) { self.store.set_filter(filter); }

    pub fn add(&mut self, text: &str) -> Result<TodoId, TodoError> {
        let id = self.store.add(text)?.id.clone();
        tracing::debug!(%id, "added todo");
        self.persist();
        Ok(id)
    }

    /// Returns false when no todo has this id.
    pub fn toggle(&mut self, id: &TodoId) -> bool {
        let toggled = self.store.toggle(id).is_some();
        if toggled {
            self.persist();
        }
        toggled
    }

    pub fn delete(&mut self, id: &TodoId) -> bool {
        let deleted = self.store.delete(id);
        if deleted {
            self.persist();
        }
        deleted
    }

    pub fn clear_completed(&mut self) -> Result<usize, TodoError> {
        let removed = self.store.clear_completed()?;
        tracing::debug!(removed, "cleared completed todos");
        self.persist();
        Ok(removed)
    }

    pub fn request_delete(&self, id: &TodoId) -> Option<Confirmation> {
        self.store.get(id).map(|todo| Confirmation::Delete(todo.id.clone()))
    }

    /// Nothing to clear is reported before the user is asked anything.
    pub fn request_clear_completed(&self) -> Result<Confirmation, TodoError> {
        match self.store.counts().completed {
            0 => Err(TodoError::NothingToClear),
            count => Ok(Confirmation::ClearCompleted { count }),
        }
    }

    pub fn confirm(&mut self, confirmation: Confirmation) -> Result<(), TodoError> {
        match confirmation {
            Confirmation::Delete(id) => {
                self.delete(&id);
                Ok(())
            }
            Confirmation::ClearCompleted { .. } => self.clear_completed().map(|_| ()),
        }
    }

    /// Empties the list and removes the stored value.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.saves.clear();
    }

    pub async fn flush(&self) { self.saves.flush().await; }

    pub async fn shutdown(self) { self.saves.shutdown().await; }

    fn persist(&self) { self.saves.save(self.store.todos().to_vec()); }
}
