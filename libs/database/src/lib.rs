//! Database library providing the PostgreSQL connector and shared utilities
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL support with SeaORM
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All database features
//!
//! # Examples
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
