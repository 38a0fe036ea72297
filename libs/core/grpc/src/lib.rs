//! # gRPC Server Library
//!
//! Shared building blocks for the gRPC services in the monorepo.
//!
//! ## Features
//!
//! - **Server configuration**: `ServerConfig` loaded from `GRPC_*` variables
//! - **Health**: helpers around `tonic-health` for serving / not-serving flips
//! - **Layers**: tower middleware that tags each call and logs it with a
//!   severity derived from the final gRPC status code
//! - **Errors**: conversions into `tonic::Status` and the gateway HTTP mapping
//! - **Conversions**: `google.protobuf.Timestamp` to and from `chrono`
//!
//! ## Quick Start
//!
//! ```ignore
//! use core_grpc::layers::{LoggingLayer, TagsLayer};
//! use core_grpc::server::{GrpcServer, ServerConfig};
//! use tonic::transport::Server;
//!
//! let config = ServerConfig::from_env()?;
//! let (health_reporter, health_service) = GrpcServer::health_service();
//! GrpcServer::setup_health(&health_reporter, SERVICE_NAME).await;
//!
//! Server::builder()
//!     .layer(TagsLayer)
//!     .layer(LoggingLayer)
//!     .add_service(health_service)
//!     .add_service(my_service)
//!     .serve(config.socket_addr()?)
//!     .await?;
//! ```

pub mod conversions;
pub mod error;
pub mod layers;
pub mod server;

pub use error::{ToTonicOption, ToTonicResult, http_status_for};
pub use layers::{CallTags, LoggingLayer, TagsLayer};
pub use server::{GrpcServer, ServerConfig};
