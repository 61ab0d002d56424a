use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::api::{
    Activity, ActivityQuery, ApiError, CatalogClient, ErrorKind, SearchQuery, SearchResult,
    classify_error,
};
use crate::filter::{FilterStats, filter};
use crate::shorts::{self, ShortsCache};
use crate::video::VideoCandidate;

/// Channels per progress batch. Only affects reporting.
pub const BATCH_SIZE: usize = 5;
const ACTIVITY_LIMIT: u32 = 10;
const SEARCH_LIMIT: u32 = 5;

/// Outcome of the activity-feed lookup for one channel.
#[derive(Debug)]
pub enum Attempt {
    /// The lookup worked; the list may be empty.
    Found(Vec<VideoCandidate>),
    /// The API quota is spent; no further channel should be queried.
    Exhausted,
    /// The lookup failed for another reason; the search fallback should run.
    FallbackNeeded(ApiError),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Discovery {
    pub videos: Vec<VideoCandidate>,
    /// Set when discovery stopped early because the quota ran out.
    pub quota_exhausted: bool,
}

fn upload_candidate(activity: Activity) -> Option<VideoCandidate> {
    let video_id = activity.upload_video_id()?.to_string();
    Some(VideoCandidate::new(
        video_id,
        activity.snippet.title,
        activity.snippet.channel_title,
    ))
}

fn search_candidate(result: SearchResult) -> Option<VideoCandidate> {
    Some(VideoCandidate::new(
        result.id.video_id?,
        result.snippet.title,
        result.snippet.channel_title,
    ))
}

fn log_filtered(channel_id: &str, stats: FilterStats) {
    if stats.excluded() > 0 {
        debug!(
            "Channel {channel_id}: skipped {} shorts and {} teasers/trailers",
            stats.shorts, stats.teasers
        );
    }
}

/// Primary lookup: the channel's recent upload activities.
pub fn from_activities(
    client: &impl CatalogClient,
    channel_id: &str,
    since: DateTime<Utc>,
    shorts: &ShortsCache,
) -> Attempt {
    let query = ActivityQuery {
        channel_id,
        published_after: since,
        max_results: ACTIVITY_LIMIT,
    };
    match client.list_activities(&query) {
        Ok(page) => {
            let candidates = page.items.into_iter().filter_map(upload_candidate).collect();
            let (videos, stats) = filter(candidates, shorts);
            log_filtered(channel_id, stats);
            Attempt::Found(videos)
        }
        Err(err) if classify_error(&err) == ErrorKind::Quota => Attempt::Exhausted,
        Err(err) => Attempt::FallbackNeeded(err),
    }
}

/// Fallback lookup: a date-ordered video search scoped to the channel.
pub fn from_search(
    client: &impl CatalogClient,
    channel_id: &str,
    since: DateTime<Utc>,
    shorts: &ShortsCache,
) -> Result<Vec<VideoCandidate>, ApiError> {
    let query = SearchQuery {
        channel_id,
        published_after: since,
        max_results: SEARCH_LIMIT,
    };
    let page = client.search_videos(&query)?;
    let candidates = page.items.into_iter().filter_map(search_candidate).collect();
    let (videos, stats) = filter(candidates, shorts);
    log_filtered(channel_id, stats);
    Ok(videos)
}

/// New videos for one channel, or `None` once the quota is exhausted.
pub fn discover_channel(
    client: &impl CatalogClient,
    channel_id: &str,
    since: DateTime<Utc>,
    shorts: &ShortsCache,
    pb: &ProgressBar,
) -> Option<Vec<VideoCandidate>> {
    let err = match from_activities(client, channel_id, since, shorts) {
        Attempt::Found(videos) => return Some(videos),
        Attempt::Exhausted => return None,
        Attempt::FallbackNeeded(err) => err,
    };

    pb.suspend(|| {
        warn!("Error fetching activities for channel {channel_id}: {err}; falling back to search")
    });
    match from_search(client, channel_id, since, shorts) {
        Ok(videos) => Some(videos),
        Err(err) => {
            pb.suspend(|| {
                if classify_error(&err) == ErrorKind::Quota {
                    warn!("Quota exceeded while searching channel {channel_id}")
                } else {
                    warn!("Error searching videos for channel {channel_id}: {err}")
                }
            });
            Some(Vec::new())
        }
    }
}

/// Walks `channel_ids` in order, collecting new long-form uploads. Stops at
/// the first quota-exhausted channel and keeps what was found before it.
pub fn discover(
    client: &impl CatalogClient,
    channel_ids: &[String],
    since: DateTime<Utc>,
    shorts: &ShortsCache,
    pb: &ProgressBar,
) -> Discovery {
    let mut discovery = Discovery::default();
    let batches = channel_ids.len().div_ceil(BATCH_SIZE);
    pb.set_length(channel_ids.len() as u64);

    for (index, batch) in channel_ids.chunks(BATCH_SIZE).enumerate() {
        pb.suspend(|| {
            info!(
                "Processing batch {} of {} ({} channels)",
                index + 1,
                batches,
                batch.len()
            )
        });
        for channel_id in batch {
            pb.set_message(channel_id.clone());
            let Some(videos) = discover_channel(client, channel_id, since, shorts, pb) else {
                pb.suspend(|| warn!("Quota limit reached. Stopping further processing."));
                discovery.quota_exhausted = true;
                return discovery;
            };
            pb.inc(1);
            for video in &videos {
                pb.suspend(|| info!("Found new video: {} ({})", video.title, video.channel));
            }
            discovery.videos.extend(videos);
        }
    }

    pb.suspend(|| info!("Found {} new videos.", discovery.videos.len()));
    discovery
}

/// Builds the shorts cache for the whole subscription list, then discovers.
pub fn discover_new_videos(
    client: &impl CatalogClient,
    channel_ids: &[String],
    since: DateTime<Utc>,
    pb: &ProgressBar,
) -> Discovery {
    info!("Checking for new videos since {}...", crate::checkpoint::format_timestamp(&since));
    let shorts = shorts::build_cache(client, channel_ids, since, shorts::CACHE_MAX_PER_CHANNEL);
    discover(client, channel_ids, since, &shorts, pb)
}
