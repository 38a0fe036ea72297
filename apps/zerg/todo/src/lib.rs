//! ToDo gRPC Service
//!
//! A microservice for managing todo items via gRPC.
//!
//! ## Architecture
//!
//! ```text
//! Client / REST gateway
//!   ↓ (gRPC, optional Zstd compression)
//! TagsLayer → LoggingLayer (core_grpc::layers)
//!   ↓
//! TodoServiceImpl (service.rs)
//!   ↓ (proto ↔ domain conversions via From/TryFrom traits)
//! TodoService (domain layer, API version check)
//!   ↓
//! PgTodoRepository (persistence)
//!   ↓
//! PostgreSQL
//! ```
//!
//! ## Modules
//!
//! - `server`: process startup and the host lifecycle
//!   (`Created → Listening → ShuttingDown → Stopped`)
//! - `service`: gRPC service implementation (TodoServiceImpl)
//! - `shutdown`: signal handling and the idempotent shutdown trigger

pub mod server;
pub mod service;
pub mod shutdown;

#[cfg(test)]
mod testing;

// Re-export for convenience
pub use server::{ServerState, TodoServer, run};
pub use service::TodoServiceImpl;
pub use shutdown::ShutdownCoordinator;
