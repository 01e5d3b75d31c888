use thiserror::Error;

use super::todo::MAX_TEXT_LEN;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoError {
    #[error("todo text is empty")]
    EmptyText,
    #[error("todo text is {len} characters, limit is {}", MAX_TEXT_LEN)]
    TextTooLong { len: usize },
    #[error("there are no completed todos to clear")]
    NothingToClear,
}
