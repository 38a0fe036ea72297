//! PostgreSQL database connector and utilities
//!
//! Provides connection management with startup retry and a readiness probe.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{close, connect_from_config_with_retry, connect_with_options};
pub use health::check_health;

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
