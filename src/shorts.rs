use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::{CatalogClient, ErrorKind, PlaylistItemQuery, classify_error, pages};
use crate::checkpoint::parse_timestamp;

const CHANNEL_PREFIX: &str = "UC";
const SHORTS_PLAYLIST_PREFIX: &str = "UUSH";
const MAX_PAGE_SIZE: usize = 50;

pub const CACHE_MAX_PER_CHANNEL: usize = 20;

/// Video ids known to be short-form, for one run.
pub type ShortsCache = HashSet<String>;

/// Id of the playlist holding a channel's short-form uploads. Only regular
/// `UC...` channel ids have one.
pub fn shorts_playlist_id(channel_id: &str) -> Option<String> {
    channel_id
        .strip_prefix(CHANNEL_PREFIX)
        .map(|rest| format!("{SHORTS_PLAYLIST_PREFIX}{rest}"))
}

/// Short-form videos the channel added after `since`, newest first.
///
/// The playlist is ordered newest first, so paging stops at the first item
/// at or before `since`. Never fails: a missing or private playlist yields
/// what was collected so far, anything else yields nothing.
pub fn list_recent_shorts(
    client: &impl CatalogClient,
    channel_id: &str,
    since: DateTime<Utc>,
    max_results: usize,
) -> HashSet<String> {
    let mut found = HashSet::new();
    let Some(playlist_id) = shorts_playlist_id(channel_id) else {
        return found;
    };
    if max_results == 0 {
        return found;
    }

    let query = PlaylistItemQuery {
        playlist_id: &playlist_id,
        video_id: None,
        max_results: max_results.min(MAX_PAGE_SIZE) as u32,
    };

    'pages: for page in pages(|token| client.list_playlist_items(&query, token)) {
        let items = match page {
            Ok(items) => items,
            Err(err) => match classify_error(&err) {
                ErrorKind::NotFound | ErrorKind::Forbidden => {
                    debug!("No shorts playlist for channel {channel_id}: {err}");
                    break 'pages;
                }
                ErrorKind::Quota | ErrorKind::Other => {
                    warn!("Error fetching shorts for channel {channel_id}: {err}");
                    return HashSet::new();
                }
            },
        };

        for item in items {
            let Some(video_id) = item.video_id() else {
                continue;
            };
            let Some(published) = item.published_at().and_then(parse_timestamp) else {
                debug!("Skipping short {video_id} without a usable publish time");
                continue;
            };
            if published <= since {
                break 'pages;
            }
            found.insert(video_id.to_string());
            if found.len() >= max_results {
                break 'pages;
            }
        }
    }

    found
}

/// Union of recent shorts across `channel_ids`, built once per run.
pub fn build_cache(
    client: &impl CatalogClient,
    channel_ids: &[String],
    since: DateTime<Utc>,
    max_per_channel: usize,
) -> ShortsCache {
    info!("Building shorts cache for {} channels...", channel_ids.len());
    let cache: ShortsCache = channel_ids
        .iter()
        .flat_map(|channel_id| list_recent_shorts(client, channel_id, since, max_per_channel))
        .collect();
    info!("Shorts cache holds {} videos.", cache.len());
    cache
}
