use rpc::todo::v1::API_VERSION;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{TodoError, TodoResult};
use crate::models::{NewTodo, Todo};
use crate::repository::TodoRepository;

/// Service layer for the todo operations
///
/// Every operation checks the API version before it touches the repository.
#[derive(Clone)]
pub struct TodoService<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Reject any API version other than the one this service implements
    pub fn check_api(api: &str) -> TodoResult<()> {
        if api == API_VERSION {
            Ok(())
        } else {
            Err(TodoError::UnsupportedApi {
                supported: API_VERSION,
                requested: api.to_string(),
            })
        }
    }

    /// Store a new todo and return its id
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, api: &str, input: NewTodo) -> TodoResult<i64> {
        Self::check_api(api)?;
        self.repository.insert(input).await
    }

    /// Get a todo by id
    #[instrument(skip(self))]
    pub async fn read(&self, api: &str, id: i64) -> TodoResult<Todo> {
        Self::check_api(api)?;

        let mut rows = self.repository.select_by_id(id).await?;
        match rows.len() {
            0 => Err(TodoError::NotFound(id)),
            1 => Ok(rows.remove(0)),
            count => Err(TodoError::Inconsistent { id, count }),
        }
    }

    /// Replace every mutable field of `todo.id`; returns the affected count
    #[instrument(skip(self, todo), fields(id = todo.id))]
    pub async fn update(&self, api: &str, todo: Todo) -> TodoResult<u64> {
        Self::check_api(api)?;

        let id = todo.id;
        match self.repository.update(todo).await? {
            0 => Err(TodoError::NotFound(id)),
            updated => Ok(updated),
        }
    }

    /// Delete a todo
    #[instrument(skip(self))]
    pub async fn delete(&self, api: &str, id: i64) -> TodoResult<()> {
        Self::check_api(api)?;

        match self.repository.delete(id).await? {
            0 => Err(TodoError::NotFound(id)),
            _ => Ok(()),
        }
    }

    /// Every stored todo; empty when there are none
    #[instrument(skip(self))]
    pub async fn read_all(&self, api: &str) -> TodoResult<Vec<Todo>> {
        Self::check_api(api)?;
        self.repository.select_all().await
    }
}
