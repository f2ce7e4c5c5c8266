//! Archivist command-line interface.
//!
//! Runs the knowledge store MCP server over stdio (the default), TCP, or HTTP
//! (`serve`, with the `api` feature).

use anyhow::{Context, Result};
use archivist::{McpRouter, ServerConfig};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "archivist", version, about = "Knowledge store MCP server")]
struct Cli {
    /// Configuration file (.toml, .yaml, .yml or .json)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Knowledge store directory, overrides the configuration
    #[arg(short = 's', long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve JSON-RPC on stdin/stdout
    Stdio,

    /// Serve newline-delimited JSON-RPC over TCP
    Tcp {
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        #[arg(short = 'p', long, default_value_t = 7070)]
        port: u16,
    },

    /// Start the HTTP API server
    #[cfg(feature = "api")]
    Serve {
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        #[arg(short = 'p', long, default_value_t = 8080)]
        port: u16,
    },
}

fn init_tracing() {
    // stdout is the protocol channel
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => match ServerConfig::discover()? {
            Some(config) => config,
            None => {
                tracing::debug!("No configuration file found, using defaults");
                ServerConfig::default()
            }
        },
    };

    let mut config = config.apply_env_overrides();
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let router = Arc::new(McpRouter::from_config(&config).context("Failed to open knowledge store")?);

    tracing::info!(
        "{} {} serving {}",
        config.server_name,
        config.server_version,
        config.store_path.display()
    );

    let server = {
        let router = Arc::clone(&router);
        async move {
            match cli.command.unwrap_or(Commands::Stdio) {
                Commands::Stdio => archivist::transport::run_stdio(router).await,
                Commands::Tcp { host, port } => {
                    let addr: SocketAddr = format!("{}:{}", host, port)
                        .parse()
                        .map_err(|e| archivist::ArchivistError::validation(format!("Invalid address: {}", e)))?;
                    archivist::transport::serve_tcp(router, addr).await
                }
                #[cfg(feature = "api")]
                Commands::Serve { host, port } => archivist::api::serve(router, host, port).await,
            }
        }
    };

    tokio::select! {
        result = server => result?,
        _ = shutdown_signal() => {}
    }

    router.store().shutdown().context("Failed to shut down knowledge store")?;
    Ok(())
}
