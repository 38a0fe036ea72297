//! gRPC Server Builder
//!
//! Utilities shared by gRPC hosts: environment-driven configuration, startup
//! logging and health reporting.
//!
//! ```ignore
//! use core_grpc::server::{GrpcServer, ServerConfig};
//! use core_config::FromEnv;
//!
//! let config = ServerConfig::from_env()?;
//! let (health_reporter, health_service) = GrpcServer::health_service();
//!
//! GrpcServer::setup_health(&health_reporter, SERVICE_NAME).await;
//! GrpcServer::log_startup(&config, SERVICE_NAME);
//! // ... serve ...
//! GrpcServer::mark_not_serving(&health_reporter, SERVICE_NAME).await;
//! ```

mod builder;
mod config;

pub use builder::{GrpcServer, create_health_service};
pub use config::ServerConfig;
