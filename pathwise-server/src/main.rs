use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pathwise_core::config::PathwiseConfig;
use pathwise_server::{engine::Engine, session};

/// In-memory directed graph server speaking a line protocol
#[derive(Parser, Debug)]
#[command(name = "pathwise-server", version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "PATHWISE_CONFIG")]
    config: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = PathwiseConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    config.validate()?;

    tracing::info!("Starting pathwise v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Idle timeout: {} ms, max line length: {} bytes",
        config.server.idle_timeout_ms,
        config.server.max_line_length
    );

    let engine = Arc::new(Engine::new());

    tokio::select! {
        result = session::run_server(engine, &config.server) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
