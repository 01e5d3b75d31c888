use crate::domain::{error::TodoError, todo::TodoId};

/// Message the user has to acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptyText,
    TextTooLong,
    NothingToClear,
    LoadFailed,
}

impl Notice {
    pub fn title(self) -> &'static str {
        match self {
            Notice::NothingToClear => "No Completed Todos",
            Notice::EmptyText | Notice::TextTooLong | Notice::LoadFailed => "Error",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::EmptyText => "Please enter a todo item",
            Notice::TextTooLong => "Todo text must be less than 100 characters",
            Notice::NothingToClear => "There are no completed todos to clear.",
            Notice::LoadFailed => "Failed to load todos",
        }
    }
}

impl From<TodoError> for Notice {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::EmptyText => Notice::EmptyText,
            TodoError::TextTooLong { .. } => Notice::TextTooLong,
            TodoError::NothingToClear => Notice::NothingToClear,
        }
    }
}

/// Destructive action waiting for the user to say yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Delete(TodoId),
    ClearCompleted { count: usize },
}

impl Confirmation {
    pub fn title(&self) -> &'static str {
        match self {
            Confirmation::Delete(_) => "Delete Todo",
            Confirmation::ClearCompleted { .. } => "Clear Completed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Confirmation::Delete(_) => "Are you sure you want to delete this todo?".to_string(),
            Confirmation::ClearCompleted { count } => {
                let plural = if *count > 1 { "s" } else { "" };
                format!("Are you sure you want to delete {count} completed todo{plural}?")
            }
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            Confirmation::Delete(_) => "Delete",
            Confirmation::ClearCompleted { .. } => "Clear",
        }
    }
}
