use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::api::{
    ApiError, CatalogClient, ErrorKind, NewPlaylist, PlaylistItemQuery, Privacy, classify_error,
    pages,
};

pub const DEFAULT_PLAYLIST_NAME: &str = "Automated Watch Later";
const PLAYLIST_DESCRIPTION: &str =
    "Automatically updated playlist with new videos from subscriptions.";

/// Pause after each insert to stay under the API's burst limits.
pub const DEFAULT_INSERT_DELAY: Duration = Duration::from_millis(500);

/// Id of the user's playlist titled exactly `name`, creating one with the
/// given privacy when none exists.
pub fn resolve_or_create(
    client: &impl CatalogClient,
    name: &str,
    privacy: Privacy,
) -> Result<String, ApiError> {
    for page in pages(|token| client.list_playlists(token)) {
        if let Some(existing) = page?.into_iter().find(|p| p.snippet.title == name) {
            info!("Found existing '{name}' playlist with ID: {}", existing.id);
            return Ok(existing.id);
        }
    }

    info!("Creating new '{name}' playlist...");
    let created = client.insert_playlist(&NewPlaylist {
        title: name,
        description: PLAYLIST_DESCRIPTION,
        privacy,
    })?;
    info!("Created new playlist with ID: {}", created.id);
    Ok(created.id)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    pub added: usize,
    pub already_present: usize,
    pub failed: usize,
    /// Set when the quota ran out and the remaining ids were not attempted.
    pub quota_exhausted: bool,
}

enum Appended {
    Added,
    AlreadyPresent,
}

fn append_one(
    client: &impl CatalogClient,
    video_id: &str,
    playlist_id: &str,
) -> Result<Appended, ApiError> {
    let query = PlaylistItemQuery {
        playlist_id,
        video_id: Some(video_id),
        max_results: 1,
    };
    if !client.list_playlist_items(&query, None)?.items.is_empty() {
        return Ok(Appended::AlreadyPresent);
    }
    let item = client.insert_playlist_item(playlist_id, video_id)?;
    debug!("Inserted {video_id} as playlist item {}", item.id);
    Ok(Appended::Added)
}

/// Adds each video that is not already in the playlist. A quota error stops
/// the loop; any other failure skips just that video.
pub fn append(
    client: &impl CatalogClient,
    video_ids: &[String],
    playlist_id: &str,
    delay: Duration,
) -> AppendSummary {
    info!("Adding {} videos to playlist...", video_ids.len());
    let mut summary = AppendSummary::default();

    for video_id in video_ids {
        match append_one(client, video_id, playlist_id) {
            Ok(Appended::AlreadyPresent) => {
                info!("Video {video_id} is already in the playlist. Skipping.");
                summary.already_present += 1;
            }
            Ok(Appended::Added) => {
                info!("Added: {video_id}");
                summary.added += 1;
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
            Err(err) => {
                let kind = classify_error(&err);
                if kind == ErrorKind::Quota {
                    error!("Failed to add video {video_id}: {err}");
                    error!("API quota exceeded. Try again tomorrow or request higher quota limits.");
                    summary.quota_exhausted = true;
                    break;
                }
                summary.failed += 1;
                match kind {
                    ErrorKind::NotFound => warn!(
                        "Failed to add video {video_id}: {err}. Video may have been removed or is not accessible."
                    ),
                    ErrorKind::Forbidden => warn!(
                        "Failed to add video {video_id}: {err}. Access to playlist is restricted; check the granted permissions."
                    ),
                    _ => warn!("Failed to add video {video_id}: {err}"),
                }
            }
        }
    }

    info!(
        "Summary: Added {} videos, {} were already in the playlist.",
        summary.added, summary.already_present
    );
    summary
}
