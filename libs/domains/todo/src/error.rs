use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("unsupported API version: service implements '{supported}', but asked for '{requested}'")]
    UnsupportedApi {
        supported: &'static str,
        requested: String,
    },

    #[error("todo with id {0} not found")]
    NotFound(i64),

    #[error("inconsistent data: found {count} rows with id {id}")]
    Inconsistent { id: i64, count: usize },

    #[error("database error: {0}")]
    Database(String),
}

pub type TodoResult<T> = Result<T, TodoError>;

/// Implement From for sea_orm::DbErr
impl From<sea_orm::DbErr> for TodoError {
    fn from(err: sea_orm::DbErr) -> Self {
        TodoError::Database(err.to_string())
    }
}

/// Map domain errors onto gRPC status codes
impl From<TodoError> for tonic::Status {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::UnsupportedApi { .. } => tonic::Status::invalid_argument(err.to_string()),
            TodoError::NotFound(_) => tonic::Status::not_found(err.to_string()),
            TodoError::Inconsistent { .. } | TodoError::Database(_) => {
                tonic::Status::internal(err.to_string())
            }
        }
    }
}
