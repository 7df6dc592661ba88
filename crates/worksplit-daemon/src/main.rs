//! worksplit daemon
//!
//! Serves the assignment form and JSON API.

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use worksplit_api::{create_router, AppState};
use worksplit_core::{DaemonConfig, LoggingConfig, RemainderPolicy};

/// worksplitd - splits homework problems among study group members
#[derive(Parser, Debug)]
#[command(name = "worksplitd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the server (overrides config)
    #[arg(long)]
    address: Option<String>,

    /// Port for the server (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Remainder policy: random, random-extra or round-robin (overrides config)
    #[arg(long)]
    policy: Option<RemainderPolicy>,

    /// Fixed seed for reproducible assignments (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level or filter directive (overrides config)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Load the config file, if any, and apply command-line overrides
    fn into_config(self) -> anyhow::Result<DaemonConfig> {
        let mut config = match &self.config {
            Some(path) => DaemonConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => DaemonConfig::default(),
        };

        if let Some(address) = self.address {
            config.api.address = address;
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(policy) = self.policy {
            config.assignment.policy = policy;
        }
        if self.seed.is_some() {
            config.assignment.seed = self.seed;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("invalid log level '{}'", config.level))?;
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false);

    let result = match (&config.file, config.format.as_str()) {
        (Some(path), format) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let builder = builder.with_ansi(false).with_writer(std::sync::Mutex::new(file));
            if format == "compact" {
                tracing::subscriber::set_global_default(builder.compact().finish())
            } else {
                tracing::subscriber::set_global_default(builder.finish())
            }
        }
        (None, "compact") => tracing::subscriber::set_global_default(builder.compact().finish()),
        (None, _) => tracing::subscriber::set_global_default(builder.finish()),
    };
    result.context("failed to set subscriber")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config.logging)?;

    info!("Starting worksplit daemon v{}", env!("CARGO_PKG_VERSION"));

    let addr: SocketAddr = format!("{}:{}", config.api.address, config.api.port)
        .parse()
        .context("invalid listen address")?;

    let state = Arc::new(AppState::new(config));
    let router = create_router(state);

    info!("Form available at http://{}/", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}
