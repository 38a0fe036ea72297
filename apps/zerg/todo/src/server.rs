//! gRPC server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - Database connection and startup health check
//! - Service creation
//! - gRPC server configuration, middleware and startup
//! - Health check service (grpc.health.v1.Health)
//! - Graceful shutdown with a bounded drain

use core_config::{Environment, FromEnv};
use core_grpc::{GrpcServer, LoggingLayer, ServerConfig, TagsLayer};
use database::postgres::PostgresConfig;
use domain_todo::{PgTodoRepository, TodoRepository, TodoService};
use eyre::{Result, WrapErr};
use rpc::todo::v1::to_do_service_server::{SERVICE_NAME, ToDoServiceServer};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tracing::{info, warn};

use crate::service::TodoServiceImpl;
use crate::shutdown::ShutdownCoordinator;

/// Host lifecycle; only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Listening,
    ShuttingDown,
    Stopped,
}

/// The ToDo gRPC host
pub struct TodoServer<R>
where
    R: TodoRepository + 'static,
{
    config: ServerConfig,
    service: TodoServiceImpl<R>,
    shutdown: ShutdownCoordinator,
    state: watch::Sender<ServerState>,
}

impl<R> TodoServer<R>
where
    R: TodoRepository + 'static,
{
    pub fn new(
        config: ServerConfig,
        service: TodoService<R>,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        let (state, _) = watch::channel(ServerState::Created);
        Self {
            config,
            service: TodoServiceImpl::new(service),
            shutdown,
            state,
        }
    }

    /// Observe lifecycle transitions
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn serve(self) -> Result<()> {
        let addr_string = self.config.addr_string();
        let addr = self
            .config
            .socket_addr()
            .wrap_err_with(|| format!("Failed to parse server address: {addr_string}"))?;

        let listener = TcpListener::bind(addr)
            .await
            .wrap_err_with(|| format!("Failed to bind {addr}"))?;

        self.serve_with_listener(listener).await
    }

    /// Serve on an already bound listener until shutdown.
    ///
    /// On shutdown the health status flips to `NOT_SERVING`, new connections
    /// are refused and in-flight calls get `shutdown_timeout` to finish.
    pub async fn serve_with_listener(self, listener: TcpListener) -> Result<()> {
        let Self {
            config,
            service,
            shutdown,
            state,
        } = self;

        let (health_reporter, health_service) = GrpcServer::health_service();
        GrpcServer::setup_health(&health_reporter, SERVICE_NAME).await;

        let mut todo_service = ToDoServiceServer::new(service)
            .max_decoding_message_size(config.max_decoding_message_size)
            .max_encoding_message_size(config.max_encoding_message_size);
        if config.enable_compression {
            todo_service = todo_service
                .accept_compressed(CompressionEncoding::Zstd)
                .send_compressed(CompressionEncoding::Zstd);
        }

        GrpcServer::log_startup(&config, SERVICE_NAME);
        if let Ok(local) = listener.local_addr() {
            info!(addr = %local, "ToDoService listening");
        }

        let (stop_accepting, stopped) = oneshot::channel::<()>();
        let server = Server::builder()
            .layer(TagsLayer)
            .layer(LoggingLayer)
            .add_service(health_service)
            .add_service(todo_service)
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                let _ = stopped.await;
            });
        tokio::pin!(server);

        state.send_replace(ServerState::Listening);

        let result = tokio::select! {
            result = &mut server => result.wrap_err("gRPC server failed"),
            _ = shutdown.wait() => {
                state.send_replace(ServerState::ShuttingDown);
                warn!("Shutting down gRPC server");

                GrpcServer::mark_not_serving(&health_reporter, SERVICE_NAME).await;
                let _ = stop_accepting.send(());

                match tokio::time::timeout(config.shutdown_timeout, &mut server).await {
                    Ok(result) => result.wrap_err("gRPC server failed during shutdown"),
                    Err(_) => {
                        warn!(
                            timeout_secs = config.shutdown_timeout.as_secs(),
                            "Drain timed out, abandoning in-flight calls"
                        );
                        Ok(())
                    }
                }
            }
        };

        state.send_replace(ServerState::Stopped);
        info!("gRPC server stopped");
        result
    }
}

/// Run the gRPC server
///
/// This is the main entry point for server initialization. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Loads server and database configuration from the environment
/// 3. Connects to the database with retry logic and checks it responds
/// 4. Serves until SIGINT or SIGTERM, then drains and closes the pool
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is missing or invalid
/// - Database connection or health check fails
/// - Server binding fails
/// - Server runtime encounters an error
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let server_config =
        ServerConfig::from_env().wrap_err("Failed to load gRPC server configuration")?;
    let db_config = PostgresConfig::from_env().wrap_err("Failed to load database configuration")?;

    info!(url = %db_config.redacted_url(), "Connecting to database...");
    let db = database::postgres::connect_from_config_with_retry(db_config, None)
        .await
        .wrap_err("Failed to connect to database")?;
    database::postgres::check_health(&db)
        .await
        .wrap_err("Database health check failed")?;
    info!("Connected to database successfully");

    let service = TodoService::new(PgTodoRepository::new(db.clone()));

    let shutdown = ShutdownCoordinator::new();
    tokio::spawn(shutdown.clone().listen_for_signals());

    let result = TodoServer::new(server_config, service, shutdown).serve().await;

    database::postgres::close(db).await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BlockingTodoRepository, CapturedLogs, InMemoryTodoRepository};
    use chrono::{TimeZone, Utc};
    use prost_types::Timestamp;
    use rpc::todo::v1::to_do_service_client::ToDoServiceClient;
    use rpc::todo::v1::{
        CreateRequest, DeleteRequest, ReadAllRequest, ReadRequest, ToDo, UpdateRequest,
    };
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tonic::Code;
    use tonic::transport::Channel;
    use tonic_health::pb::HealthCheckRequest;
    use tonic_health::pb::health_check_response::ServingStatus;
    use tonic_health::pb::health_client::HealthClient;

    struct Running {
        addr: SocketAddr,
        shutdown: ShutdownCoordinator,
        state: watch::Receiver<ServerState>,
        handle: tokio::task::JoinHandle<Result<()>>,
    }

    async fn start(next_id: i64) -> Running {
        start_with(InMemoryTodoRepository::new().with_next_id(next_id), |config| config).await
    }

    async fn start_with<R>(
        repository: R,
        configure: impl FnOnce(ServerConfig) -> ServerConfig,
    ) -> Running
    where
        R: TodoRepository + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let config = configure(
            ServerConfig::new(addr.port())
                .with_host("127.0.0.1")
                .with_shutdown_timeout(Duration::from_secs(5)),
        );
        let shutdown = ShutdownCoordinator::new();

        let server = TodoServer::new(config, TodoService::new(repository), shutdown.clone());
        let mut state = server.state();
        assert_eq!(*state.borrow(), ServerState::Created);

        let handle = tokio::spawn(server.serve_with_listener(listener));
        state
            .wait_for(|s| *s == ServerState::Listening)
            .await
            .unwrap();

        Running {
            addr,
            shutdown,
            state,
            handle,
        }
    }

    /// Whether a call on a brand new connection gets answered.
    async fn served_on_new_connection(addr: SocketAddr) -> bool {
        let Ok(channel) = Channel::from_shared(format!("http://{addr}")).unwrap().connect().await
        else {
            return false;
        };

        ToDoServiceClient::new(channel)
            .read_all(ReadAllRequest {
                api: "v1".to_string(),
            })
            .await
            .is_ok()
    }

    async fn channel(addr: SocketAddr) -> Channel {
        Channel::from_shared(format!("http://{addr}"))
            .unwrap()
            .connect()
            .await
            .unwrap()
    }

    fn to_do(id: i64, title: &str) -> ToDo {
        ToDo {
            id,
            title: title.to_string(),
            description: "d1".to_string(),
            reminder: Some(Timestamp {
                seconds: Utc
                    .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                    .unwrap()
                    .timestamp(),
                nanos: 0,
            }),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_over_tcp() {
        let running = start(42).await;
        let mut client = ToDoServiceClient::new(channel(running.addr).await);

        let created = client
            .create(CreateRequest {
                api: "v1".to_string(),
                to_do: Some(to_do(0, "t1")),
            })
            .await
            .unwrap()
            .into_inner();
        assert_eq!(created.api, "v1");
        assert_eq!(created.id, 42);

        let read = client
            .read(ReadRequest {
                api: "v1".to_string(),
                id: 42,
            })
            .await
            .unwrap()
            .into_inner();
        assert_eq!(read.to_do, Some(to_do(42, "t1")));

        let updated = client
            .update(UpdateRequest {
                api: "v1".to_string(),
                to_do: Some(to_do(42, "t2")),
            })
            .await
            .unwrap()
            .into_inner();
        assert_eq!(updated.updated, 1);

        let all = client
            .read_all(ReadAllRequest {
                api: "v1".to_string(),
            })
            .await
            .unwrap()
            .into_inner();
        assert_eq!(all.to_dos, vec![to_do(42, "t2")]);

        client
            .delete(DeleteRequest {
                api: "v1".to_string(),
                id: 42,
            })
            .await
            .unwrap();

        let status = client
            .read(ReadRequest {
                api: "v1".to_string(),
                id: 42,
            })
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);

        let status = client
            .read_all(ReadAllRequest {
                api: "v2".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        drop(client);
        assert!(running.shutdown.shutdown());
        assert!(!running.shutdown.shutdown());

        running.handle.await.unwrap().unwrap();
        assert_eq!(*running.state.borrow(), ServerState::Stopped);
    }

    #[tokio::test]
    async fn test_health_reports_serving() {
        let running = start(1).await;
        let mut health = HealthClient::new(channel(running.addr).await);

        for service in [SERVICE_NAME, ""] {
            let response = health
                .check(HealthCheckRequest {
                    service: service.to_string(),
                })
                .await
                .unwrap()
                .into_inner();
            assert_eq!(response.status, ServingStatus::Serving as i32);
        }

        drop(health);
        running.shutdown.shutdown();
        running.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_before_traffic() {
        let mut running = start(1).await;

        running.shutdown.shutdown();
        running
            .state
            .wait_for(|s| *s == ServerState::Stopped)
            .await
            .unwrap();
        running.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_drains_in_flight_call() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let repository = BlockingTodoRepository::new(entered.clone(), release.clone());
        let mut running = start_with(repository, |config| config).await;

        let mut client = ToDoServiceClient::new(channel(running.addr).await);
        let in_flight = tokio::spawn(async move {
            client
                .read_all(ReadAllRequest {
                    api: "v1".to_string(),
                })
                .await
        });
        entered.notified().await;

        assert!(running.shutdown.shutdown());
        running
            .state
            .wait_for(|s| *s == ServerState::ShuttingDown)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let served = tokio::time::timeout(
            Duration::from_millis(300),
            served_on_new_connection(running.addr),
        )
        .await
        .unwrap_or(false);
        assert!(!served, "new call answered while shutting down");
        assert_eq!(*running.state.borrow(), ServerState::ShuttingDown);

        release.notify_one();
        let response = in_flight.await.unwrap().unwrap().into_inner();
        assert_eq!(response.api, "v1");
        assert!(response.to_dos.is_empty());

        running.handle.await.unwrap().unwrap();
        assert_eq!(*running.state.borrow(), ServerState::Stopped);
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_shutdown_timeout() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let repository = BlockingTodoRepository::new(entered.clone(), release);
        let running = start_with(repository, |config| {
            config.with_shutdown_timeout(Duration::from_millis(200))
        })
        .await;

        let mut client = ToDoServiceClient::new(channel(running.addr).await);
        let stuck = tokio::spawn(async move {
            client
                .read_all(ReadAllRequest {
                    api: "v1".to_string(),
                })
                .await
        });
        entered.notified().await;

        running.shutdown.shutdown();
        let result = tokio::time::timeout(Duration::from_secs(5), running.handle)
            .await
            .expect("drain should be bounded by shutdown_timeout")
            .unwrap();
        assert!(result.is_ok());
        assert_eq!(*running.state.borrow(), ServerState::Stopped);

        stuck.abort();
    }

    #[tokio::test]
    async fn test_status_sent_in_trailers_is_logged() {
        let (logs, _guard) = CapturedLogs::install();
        let running = start_with(InMemoryTodoRepository::new(), |mut config| {
            config.max_encoding_message_size = 64;
            config
        })
        .await;
        let mut client = ToDoServiceClient::new(channel(running.addr).await);

        let created = client
            .create(CreateRequest {
                api: "v1".to_string(),
                to_do: Some(to_do(0, &"t".repeat(200))),
            })
            .await
            .unwrap()
            .into_inner();

        let status = client
            .read(ReadRequest {
                api: "v1".to_string(),
                id: created.id,
            })
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::OutOfRange);

        drop(client);
        running.shutdown.shutdown();
        running.handle.await.unwrap().unwrap();

        let finished = logs.lines_containing("finished call");
        let read = finished
            .iter()
            .find(|line| line.contains("grpc.method=Read"))
            .expect("Read call logged");
        assert!(read.contains("grpc.code=OutOfRange"), "{read}");
        assert!(read.contains("WARN"), "{read}");
        let read_logged_ok = finished
            .iter()
            .any(|line| line.contains("grpc.method=Read") && line.contains("grpc.code=Ok"));
        assert!(!read_logged_ok);
    }
}
