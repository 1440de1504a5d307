//! sweep — administrative idle-account purge command.
//!
//! `sweep --as <caller> purge players` starts a purge session over the
//! player tree and waits for it to finish, printing progress lines as
//! shards complete. Pre-flight failures (rank, argument, already running)
//! are reported synchronously and nothing is started.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use sweep_core::{load_dotenv, Config};
use sweep_directory::{DeletedFileReaper, FsPlayerDirectory};
use sweep_engine::PurgeController;
use sweep_notify::{EmailNotifier, LogNotifier, Notifier, ProgressSink};

// ── CLI ─────────────────────────────────────────────────────────────

/// Idle-account purge for the player base.
#[derive(Parser, Debug)]
#[command(name = "sweep", version, about)]
struct Cli {
    /// Root of the player data tree.
    #[arg(long, env = "SWEEP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory for daily purge logs.
    #[arg(long, env = "SWEEP_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Account name the command runs as (must hold the top rank).
    #[arg(long = "as", env = "SWEEP_CALLER")]
    caller: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the player base and purge idle accounts ("players" is the
    /// only accepted target).
    Purge { target: String },
}

// ── Progress to stdout ──────────────────────────────────────────────

struct StdoutSink;

impl ProgressSink for StdoutSink {
    fn send(&self, line: &str) {
        println!("{}", line);
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let config = Config::from_env();

    let data_dir = cli.data_dir.unwrap_or(config.storage.data_dir.clone());
    let log_dir = cli.log_dir.unwrap_or(config.storage.log_dir.clone());

    let directory = Arc::new(FsPlayerDirectory::open(&data_dir)?);
    let reaper = Arc::new(DeletedFileReaper::new(&data_dir));

    let mailer: Arc<dyn Notifier> = match EmailNotifier::from_config(&config.smtp) {
        Ok(notifier) => Arc::new(notifier),
        Err(e) => {
            info!(reason = %e, "mail delivery disabled, notifications go to the log");
            Arc::new(LogNotifier)
        }
    };

    let controller = PurgeController::new(directory, reaper, mailer, log_dir);

    match cli.command {
        Command::Purge { target } => {
            let sink: Arc<dyn ProgressSink> = Arc::new(StdoutSink);
            let started = controller.start_purge(&cli.caller, &sink, &target)?;
            println!(
                "purge started by {}; log: {}",
                cli.caller,
                started.log_path.display()
            );
            started.handle.await?;
        }
    }

    Ok(())
}
