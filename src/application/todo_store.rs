use std::collections::HashSet;

use chrono::Utc;

use crate::domain::{
    error::TodoError,
    todo::{validate_text, Counts, Filter, Todo, TodoId},
};

/// In-memory todo list plus the filter the user is looking through.
///
/// The list is ordered newest first. Reads never reorder or mutate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoStore {
    todos: Vec<Todo>,
    filter: Filter,
}

impl TodoStore {
    pub fn new() -> Self { Self::default() }

    /// Builds a store from a loaded list. Later records reusing an id are dropped.
    pub fn from_todos(todos: Vec<Todo>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(todos.len());
        for todo in todos {
            if seen.insert(todo.id.clone()) {
                unique.push(todo);
            } else {
                tracing::warn!(id = %todo.id, "dropping todo with duplicate id");
            }
        }
        Self { todos: unique, filter: Filter::All }
    }

    pub fn todos(&self) -> &[Todo] { &self.todos }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> { self.todos.iter().find(|t| &t.id == id) }

    pub fn filter(&self) -> Filter { self.filter }

    pub fn set_filter(&mut self, filter: Filter) { self.filter = filter; }

    pub fn add(&mut self, text: &str) -> Result<&Todo, TodoError> {
        let text = validate_text(text)?;
        self.todos.insert(0, Todo::new(text, Utc::now()));
        Ok(&self.todos[0])
    }

    /// Flips completion of the matching todo. Unknown ids leave the list untouched.
    pub fn toggle(&mut self, id: &TodoId) -> Option<&Todo> {
        let todo = self.todos.iter_mut().find(|t| &t.id == id)?;
        todo.toggle(Utc::now());
        Some(todo)
    }

    pub fn delete(&mut self, id: &TodoId) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| &t.id != id);
        self.todos.len() != before
    }

    /// Removes every completed todo and returns how many went.
    pub fn clear_completed(&mut self) -> Result<usize, TodoError> {
        let completed = self.counts().completed;
        if completed == 0 {
            return Err(TodoError::NothingToClear);
        }
        self.todos.retain(|t| !t.completed);
        Ok(completed)
    }

    pub fn clear(&mut self) { self.todos.clear(); }

    pub fn filtered_view(&self, filter: Filter) -> Vec<&Todo> {
        self.todos.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn visible(&self) -> Vec<&Todo> { self.filtered_view(self.filter) }

    pub fn counts(&self) -> Counts {
        let all = self.todos.len();
        let completed = self.todos.iter().filter(|t| t.completed).count();
        Counts { all, active: all - completed, completed }
    }
}
