use async_trait::async_trait;

use crate::error::TodoResult;
use crate::models::{NewTodo, Todo};

/// Repository trait for Todo persistence
///
/// Each method is a single statement. Implementations report what the
/// datastore returned (rows, affected counts, driver errors) and never decide
/// that an item is missing; that is the service's call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a row and return the id the datastore assigned
    async fn insert(&self, input: NewTodo) -> TodoResult<i64>;

    /// Every row matching `id`; more than one means the table is corrupt
    async fn select_by_id(&self, id: i64) -> TodoResult<Vec<Todo>>;

    /// Overwrite all mutable fields of row `todo.id`, returning affected rows
    async fn update(&self, todo: Todo) -> TodoResult<u64>;

    /// Delete row `id`, returning affected rows
    async fn delete(&self, id: i64) -> TodoResult<u64>;

    /// Every row, ordered by id ascending
    async fn select_all(&self) -> TodoResult<Vec<Todo>>;
}
