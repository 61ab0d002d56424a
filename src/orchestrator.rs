use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use tracing::{error, info, warn};

use crate::api::{CatalogClient, ErrorKind, Privacy, classify_error};
use crate::checkpoint::{CheckpointStore, format_timestamp};
use crate::discovery::discover_new_videos;
use crate::playlist::{self, AppendSummary};
use crate::quota::{QuotaStatus, check_quota};
use crate::subscriptions::list_subscriptions;

pub struct RunOptions<'a> {
    pub playlist_name: &'a str,
    /// Privacy of the playlist if it has to be created.
    pub privacy: Privacy,
    pub insert_delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Everything ran; the checkpoint now holds this instant.
    Completed { checkpoint: DateTime<Utc> },
    /// Stopped early on the API quota. The checkpoint was left alone.
    QuotaExhausted,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub playlist_id: Option<String>,
    pub discovered: usize,
    pub appended: AppendSummary,
    pub status: RunStatus,
}

impl RunReport {
    fn stopped(playlist_id: Option<String>, status: RunStatus) -> Self {
        Self {
            playlist_id,
            discovered: 0,
            appended: AppendSummary::default(),
            status,
        }
    }
}

/// One full pass: probe, resolve the playlist, discover, append, checkpoint.
/// Failures end up in the report's status rather than as an error.
pub fn run_cycle(
    client: &impl CatalogClient,
    checkpoints: &CheckpointStore,
    options: &RunOptions<'_>,
    pb: &ProgressBar,
) -> RunReport {
    if check_quota(client) == QuotaStatus::Exhausted {
        warn!("Exiting due to quota limitations. Try again tomorrow.");
        return RunReport::stopped(None, RunStatus::QuotaExhausted);
    }

    let playlist_id = match playlist::resolve_or_create(client, options.playlist_name, options.privacy) {
        Ok(id) => id,
        Err(err) => {
            error!("Failed to get or create playlist: {err}");
            return RunReport::stopped(None, RunStatus::Failed(err.to_string()));
        }
    };

    let channel_ids = match list_subscriptions(client) {
        Ok(ids) => ids,
        Err(err) if classify_error(&err) == ErrorKind::Quota => {
            error!("Quota exceeded while listing subscriptions: {err}");
            return RunReport::stopped(Some(playlist_id), RunStatus::QuotaExhausted);
        }
        Err(err) => {
            error!("Failed to list subscriptions: {err}");
            return RunReport::stopped(Some(playlist_id), RunStatus::Failed(err.to_string()));
        }
    };

    let since = checkpoints.load();
    let discovery = discover_new_videos(client, &channel_ids, since, pb);
    pb.finish_and_clear();

    for video in &discovery.videos {
        info!("- {} ({})", video.title, video.channel);
    }

    let appended = if discovery.videos.is_empty() {
        info!("No new videos found.");
        AppendSummary::default()
    } else {
        let ids: Vec<String> = discovery.videos.iter().map(|v| v.id.clone()).collect();
        playlist::append(client, &ids, &playlist_id, options.insert_delay)
    };

    let status = if discovery.quota_exhausted || appended.quota_exhausted {
        warn!("Quota ran out before the run finished; last check time not updated.");
        RunStatus::QuotaExhausted
    } else {
        match checkpoints.save() {
            Ok(checkpoint) => {
                info!("Updated last check time to {}", format_timestamp(&checkpoint));
                RunStatus::Completed { checkpoint }
            }
            Err(err) => {
                error!("Failed to update last check time: {err:#}");
                RunStatus::Failed(format!("{err:#}"))
            }
        }
    };

    RunReport {
        playlist_id: Some(playlist_id),
        discovered: discovery.videos.len(),
        appended,
        status,
    }
}
