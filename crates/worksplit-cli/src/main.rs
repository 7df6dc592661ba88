//! worksplit CLI
//!
//! Command-line interface for splitting problems, either through a running
//! worksplit daemon or locally.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use worksplit_core::RemainderPolicy;

/// worksplit - splits homework problems among study group members
#[derive(Parser, Debug)]
#[command(name = "worksplit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Daemon address
    #[arg(long, default_value = "http://localhost:8501", global = true)]
    api: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split problems among members
    Assign {
        /// Member names (each argument may hold a comma-separated list)
        names: Vec<String>,

        /// Comma-separated member names
        #[arg(short, long)]
        members: Option<String>,

        /// Number of problems
        #[arg(short = 'n', long)]
        problems: i64,

        /// Subject label
        #[arg(long)]
        subject: Option<String>,

        /// Remainder policy (random, random-extra, round-robin)
        #[arg(long)]
        policy: Option<RemainderPolicy>,

        /// Seed for a reproducible assignment
        #[arg(long)]
        seed: Option<u64>,

        /// Compute locally instead of asking the daemon
        #[arg(long)]
        local: bool,

        /// Config file for local mode
        #[arg(long, requires = "local")]
        config: Option<PathBuf>,

        /// Print only the share text
        #[arg(long)]
        share: bool,
    },

    /// List subjects offered by the daemon
    Subjects,

    /// Show daemon status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let client = commands::ApiClient::new(&cli.api);

    match cli.command {
        Commands::Assign {
            names,
            members,
            problems,
            subject,
            policy,
            seed,
            local,
            config,
            share,
        } => {
            let args = commands::AssignArgs {
                members: commands::collect_members(&names, members.as_deref()),
                problems,
                subject,
                policy,
                seed,
                share_only: share,
            };
            if local {
                commands::assign_local(args, config.as_deref())?;
            } else {
                commands::assign(&client, args).await?;
            }
        }
        Commands::Subjects => {
            commands::subjects(&client).await?;
        }
        Commands::Status => {
            commands::status(&client).await?;
        }
    }

    Ok(())
}
