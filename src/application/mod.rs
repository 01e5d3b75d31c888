pub mod prompt;
pub mod save_queue;
pub mod todo_service;
pub mod todo_storage;
pub mod todo_store;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod todo_storage_tests;
