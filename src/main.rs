mod api;
mod config;
mod server;
mod store;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use config::{Config, LogConfig};
use server::Server;
use store::MemberStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// In-memory family roster served over HTTP
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to an INI configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to listen on, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides the config file and PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_port_env(std::env::var("PORT").ok())?;

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
        Ok(config)
    }
}

fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .with_context(|| format!("Invalid log level '{}'", log.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path))?;
            builder.with_ansi(false).with_writer(Arc::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}

// Requests are served one at a time on a single thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_logging(&config.log)?;

    info!("Starting family roster");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let store = MemberStore::seeded();
    info!(
        "Loaded the {} family with {} members",
        store.last_name(),
        store.len()
    );

    let server = Server::bind(&config.server_addr(), store)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr()))?;
    info!("Server listening on: {}", server.local_addr());

    server.run().await?;

    Ok(())
}
