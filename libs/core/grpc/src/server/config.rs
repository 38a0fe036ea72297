//! Server configuration loaded from environment variables.

use core_config::{ConfigError, FromEnv, env_or_default, env_parse, env_parse_required};
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_MAX_MESSAGE_SIZE: usize = 8 * 1024 * 1024;

/// Configuration for gRPC server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 0.0.0.0)
    pub host: String,
    /// Port to listen on, required
    pub port: u16,
    /// Enable Zstd compression (default: true)
    pub enable_compression: bool,
    /// Maximum message size for decoding (default: 8MB)
    pub max_decoding_message_size: usize,
    /// Maximum message size for encoding (default: 8MB)
    pub max_encoding_message_size: usize,
    /// Upper bound on draining in-flight calls after shutdown (default: 30s)
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Config for the given port with every other field at its default.
    pub fn new(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
            enable_compression: true,
            max_decoding_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_encoding_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            shutdown_timeout: Duration::from_secs(30),
        }
    }

    /// Set the host to bind to.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port to listen on.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable compression.
    pub fn with_compression(mut self, enable: bool) -> Self {
        self.enable_compression = enable;
        self
    }

    /// Set maximum message size.
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_decoding_message_size = size;
        self.max_encoding_message_size = size;
        self
    }

    /// Set the in-flight drain deadline.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Get the socket address to bind to.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.addr_string().parse()
    }

    /// Get the address string (for logging).
    pub fn addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads:
    /// - `GRPC_PORT` (required)
    /// - `GRPC_HOST` (default: 0.0.0.0)
    /// - `GRPC_COMPRESSION` (default: true)
    /// - `GRPC_MAX_MESSAGE_SIZE` (default: 8388608 / 8MB)
    /// - `GRPC_SHUTDOWN_TIMEOUT_SECS` (default: 30)
    fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse_required("GRPC_PORT")?;
        let host = env_or_default("GRPC_HOST", "0.0.0.0");
        let compression = env_or_default("GRPC_COMPRESSION", "true");
        let enable_compression = compression != "false" && compression != "0";
        let max_message_size = env_parse("GRPC_MAX_MESSAGE_SIZE", "8388608")?;
        let shutdown_timeout_secs = env_parse("GRPC_SHUTDOWN_TIMEOUT_SECS", "30")?;

        Ok(Self::new(port)
            .with_host(host)
            .with_compression(enable_compression)
            .with_max_message_size(max_message_size)
            .with_shutdown_timeout(Duration::from_secs(shutdown_timeout_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRPC_VARS: [&str; 5] = [
        "GRPC_PORT",
        "GRPC_HOST",
        "GRPC_COMPRESSION",
        "GRPC_MAX_MESSAGE_SIZE",
        "GRPC_SHUTDOWN_TIMEOUT_SECS",
    ];

    #[test]
    fn test_defaults() {
        let config = ServerConfig::new(9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert!(config.enable_compression);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
        assert_eq!(config.addr_string(), "0.0.0.0:9090");
    }

    #[test]
    fn test_builder_pattern() {
        let config = ServerConfig::new(1)
            .with_host("127.0.0.1")
            .with_port(8080)
            .with_compression(false);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.enable_compression);
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_from_env_requires_port() {
        temp_env::with_vars_unset(GRPC_VARS, || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "GRPC_PORT"));
        });
    }

    #[test]
    fn test_from_env_rejects_bad_port() {
        temp_env::with_var("GRPC_PORT", Some("not-a-port"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { .. }));
        });
    }

    #[test]
    fn test_from_env_reads_all_fields() {
        temp_env::with_vars(
            [
                ("GRPC_PORT", Some("9090")),
                ("GRPC_HOST", Some("127.0.0.1")),
                ("GRPC_COMPRESSION", Some("false")),
                ("GRPC_MAX_MESSAGE_SIZE", Some("1024")),
                ("GRPC_SHUTDOWN_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.port, 9090);
                assert_eq!(config.host, "127.0.0.1");
                assert!(!config.enable_compression);
                assert_eq!(config.max_decoding_message_size, 1024);
                assert_eq!(config.max_encoding_message_size, 1024);
                assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
            },
        );
    }
}
