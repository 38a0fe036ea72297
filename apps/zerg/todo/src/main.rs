//! ToDo gRPC Service - Entry Point
//!
//! Minimal entry point that delegates to the server module.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    core_config::tracing::install_color_eyre();
    zerg_todo::run().await
}
