use anyhow::bail;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::api::Privacy;
use crate::checkpoint::format_timestamp;
use crate::config::Config;
use crate::orchestrator::{RunOptions, RunStatus, run_cycle};

pub(crate) fn cmd_run(config: &Config, playlist_name: &str, privacy: Privacy) -> anyhow::Result<()> {
    let client = super::catalog_client(config)?;
    let checkpoints = config.checkpoint_store();

    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::default_bar().template("{bar:30.cyan} {pos}/{len} {msg}")?);

    let report = run_cycle(
        &client,
        &checkpoints,
        &RunOptions {
            playlist_name,
            privacy,
            insert_delay: config.insert_delay,
        },
        &pb,
    );

    match report.status {
        RunStatus::Completed { checkpoint } => {
            info!(
                "Done: {} new videos, {} added to {}, {} already present, {} failed.",
                report.discovered,
                report.appended.added,
                report.playlist_id.as_deref().unwrap_or("the playlist"),
                report.appended.already_present,
                report.appended.failed
            );
            info!("Next run looks for videos after {}.", format_timestamp(&checkpoint));
            Ok(())
        }
        RunStatus::QuotaExhausted => {
            info!(
                "Stopped on API quota after adding {} videos; the next run will retry from the previous check time.",
                report.appended.added
            );
            Ok(())
        }
        RunStatus::Failed(reason) => bail!("run failed: {reason}"),
    }
}
