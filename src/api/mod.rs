pub mod error;
#[cfg(test)]
pub mod fake;
pub mod pages;
pub mod youtube;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub use error::{ApiError, ErrorKind, classify_error};
pub use pages::pages;

/// One page of a paginated listing. An absent or empty continuation token
/// means the listing is exhausted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub snippet: SubscriptionSnippet,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub resource_id: ResourceId,
}

impl Subscription {
    pub fn channel_id(&self) -> Option<&str> {
        self.snippet.resource_id.channel_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub snippet: ActivitySnippet,
    #[serde(default)]
    pub content_details: Option<ActivityContentDetails>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnippet {
    /// Activity type: `upload`, `like`, `playlistItem`, ...
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityContentDetails {
    #[serde(default)]
    pub upload: Option<UploadRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRef {
    pub video_id: String,
}

impl Activity {
    /// The uploaded video's id, when this is an upload activity that carries one.
    pub fn upload_video_id(&self) -> Option<&str> {
        if self.snippet.kind != "upload" {
            return None;
        }
        self.content_details
            .as_ref()
            .and_then(|details| details.upload.as_ref())
            .map(|upload| upload.video_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: ResourceId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub snippet: Option<PlaylistItemSnippet>,
    #[serde(default)]
    pub content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
}

impl PlaylistItem {
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|details| details.video_id.as_deref())
            .or_else(|| {
                self.snippet
                    .as_ref()
                    .and_then(|s| s.resource_id.as_ref())
                    .and_then(|r| r.video_id.as_deref())
            })
    }

    /// When the item was added to its playlist.
    pub fn published_at(&self) -> Option<&str> {
        self.snippet.as_ref().and_then(|s| s.published_at.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Channel {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct ActivityQuery<'a> {
    pub channel_id: &'a str,
    pub published_after: DateTime<Utc>,
    pub max_results: u32,
}

/// Video search within one channel, newest first.
#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    pub channel_id: &'a str,
    pub published_after: DateTime<Utc>,
    pub max_results: u32,
}

/// Lists a playlist's items; with `video_id` set this doubles as a
/// membership check.
#[derive(Debug, Clone)]
pub struct PlaylistItemQuery<'a> {
    pub playlist_id: &'a str,
    pub video_id: Option<&'a str>,
    pub max_results: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Privacy {
    #[default]
    Private,
    Unlisted,
    Public,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Private => "private",
            Privacy::Unlisted => "unlisted",
            Privacy::Public => "public",
        }
    }
}

impl FromStr for Privacy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "private" => Ok(Privacy::Private),
            "unlisted" => Ok(Privacy::Unlisted),
            "public" => Ok(Privacy::Public),
            other => Err(format!("unknown privacy status {other:?}; use private, unlisted or public")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPlaylist<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub privacy: Privacy,
}

/// The subset of the video catalog API the pipeline consumes. Every listing
/// returns a [`Page`]; callers walk continuation tokens with [`pages`].
pub trait CatalogClient {
    fn list_subscriptions(&self, page_token: Option<&str>)
    -> Result<Page<Subscription>, ApiError>;

    fn list_activities(&self, query: &ActivityQuery<'_>) -> Result<Page<Activity>, ApiError>;

    fn search_videos(&self, query: &SearchQuery<'_>) -> Result<Page<SearchResult>, ApiError>;

    fn list_playlist_items(
        &self,
        query: &PlaylistItemQuery<'_>,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>, ApiError>;

    fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<PlaylistItem, ApiError>;

    fn list_playlists(&self, page_token: Option<&str>) -> Result<Page<Playlist>, ApiError>;

    fn insert_playlist(&self, playlist: &NewPlaylist<'_>) -> Result<Playlist, ApiError>;

    /// Cheapest authenticated call; used to probe reachability and quota.
    fn list_own_channels(&self) -> Result<Page<Channel>, ApiError>;
}
