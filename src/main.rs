mod api;
mod checkpoint;
mod commands;
mod config;
mod discovery;
mod filter;
mod http;
mod logging;
mod orchestrator;
mod playlist;
mod quota;
mod shorts;
mod subscriptions;
mod video;

use clap::{Parser, Subcommand};

use api::Privacy;
use config::Config;

/// Adds new long-form uploads from your YouTube subscriptions to a playlist
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Name of the playlist that receives new videos
    #[arg(long, global = true, default_value = playlist::DEFAULT_PLAYLIST_NAME)]
    playlist: String,

    /// Privacy status used if the playlist has to be created
    #[arg(long, global = true, default_value = "private")]
    privacy: Privacy,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Only log to stderr
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Find new videos since the last run and add them to the playlist
    Run,
    /// Check whether the API quota is available
    Quota,
    /// Add videos by id; reads ids from stdin when none are given
    Add {
        /// YouTube video ids
        ids: Vec<String>,
    },
    /// Show where the last check time is stored and its value
    Checkpoint,
}

impl Args {
    /// Commands that talk to the API keep a per-run log file.
    fn wants_log_file(&self) -> bool {
        !self.no_log_file && !matches!(self.command, Some(Command::Checkpoint))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    let log_dir = args.wants_log_file().then(|| config.log_dir());
    if let Some(path) = logging::init(&args.log_level, log_dir.as_deref()) {
        tracing::debug!("Logging to {}", path.display());
    }

    match args.command {
        None | Some(Command::Run) => commands::run::cmd_run(&config, &args.playlist, args.privacy),
        Some(Command::Quota) => commands::quota::cmd_quota(&config),
        Some(Command::Add { ids }) => commands::add::cmd_add(&config, &args.playlist, args.privacy, ids),
        Some(Command::Checkpoint) => commands::checkpoint::cmd_checkpoint(&config),
    }
}
