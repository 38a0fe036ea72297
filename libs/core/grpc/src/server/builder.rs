//! gRPC Server utilities.

use super::config::ServerConfig;
use tonic_health::ServingStatus;
use tonic_health::pb::health_server::{Health, HealthServer};
use tonic_health::server::HealthReporter;
use tracing::{info, warn};

/// Helper for gRPC hosts with health checks.
pub struct GrpcServer;

impl GrpcServer {
    /// Create the health reporter and the `grpc.health.v1.Health` service.
    pub fn health_service() -> (HealthReporter, HealthServer<impl Health>) {
        create_health_service()
    }

    /// Log server startup information.
    pub fn log_startup(config: &ServerConfig, service_name: &str) {
        info!(
            addr = %config.addr_string(),
            service = service_name,
            compression = config.enable_compression,
            shutdown_timeout_secs = config.shutdown_timeout.as_secs(),
            "gRPC server starting"
        );

        if config.enable_compression {
            info!("Zstd compression enabled");
        }

        info!("Health check service enabled (grpc.health.v1.Health)");
    }

    /// Set up health reporting for a single service.
    ///
    /// Marks both the specific service and empty service name as serving
    /// (empty is used by k8s default health checks).
    pub async fn setup_health(health_reporter: &HealthReporter, service_name: &str) {
        Self::set_status(health_reporter, &[service_name], ServingStatus::Serving).await;
        info!(service = service_name, "Service marked as serving");
    }

    /// Flip a service and the empty service name to `NOT_SERVING`.
    pub async fn mark_not_serving(health_reporter: &HealthReporter, service_name: &str) {
        Self::set_status(health_reporter, &[service_name], ServingStatus::NotServing).await;
        warn!(service = service_name, "Service marked as not serving");
    }

    async fn set_status(
        health_reporter: &HealthReporter,
        service_names: &[&str],
        status: ServingStatus,
    ) {
        for service_name in service_names {
            health_reporter
                .set_service_status(*service_name, status)
                .await;
        }

        health_reporter.set_service_status("", status).await;
    }
}

// Re-export health_reporter for convenience
pub use tonic_health::server::health_reporter as create_health_service;
