//! ToDo Domain
//!
//! Versioned CRUD over a single `todo` table.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← API version check, not-found semantics
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← One statement per operation (trait + PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Todo, NewTodo, SeaORM entity
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todo::{NewTodo, PgTodoRepository, TodoService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let service = TodoService::new(PgTodoRepository::new(db));
//! let id = service
//!     .create("v1", NewTodo::new("t1", "d1", None))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod conversions;
pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{TodoError, TodoResult};
pub use models::{NewTodo, Todo};
pub use postgres::PgTodoRepository;
pub use repository::TodoRepository;
pub use service::TodoService;
