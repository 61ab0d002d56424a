use anyhow::{Context, ensure};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{
    Activity, ActivityQuery, ApiError, CatalogClient, Channel, NewPlaylist, Page, Playlist,
    PlaylistItem, PlaylistItemQuery, SearchQuery, SearchResult, Subscription,
};
use crate::checkpoint::format_timestamp;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page size the listing endpoints accept.
const MAX_PAGE_SIZE: &str = "50";

/// Blocking YouTube Data API v3 client authenticated with a bearer token.
pub struct YouTubeClient {
    http: Client,
    base: Url,
    token: String,
}

impl YouTubeClient {
    pub fn new(http: Client, base_url: &str, token: impl Into<String>) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid API base URL: {base_url}"))?;
        ensure!(!base.cannot_be_a_base(), "invalid API base URL: {base_url}");
        Ok(Self {
            http,
            base,
            token: token.into(),
        })
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource);
        }
        url.query_pairs_mut().extend_pairs(params);
        url
    }

    fn get<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(resource, params);
        debug!(%url, "GET");
        let response = self.http.get(url).bearer_auth(&self.token).send()?;
        decode(resource, response)
    }

    fn post<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        params: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(resource, params);
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()?;
        decode(resource, response)
    }
}

fn decode<T: DeserializeOwned>(resource: &'static str, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text()?;
    if !status.is_success() {
        return Err(error_from_body(status.as_u16(), &text));
    }
    serde_json::from_str(&text).map_err(|source| ApiError::Json { resource, source })
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// Decodes Google's `{"error": {...}}` envelope, falling back to the raw body.
fn error_from_body(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let reason = envelope.error.errors.into_iter().find_map(|d| d.reason);
            ApiError::status(status, reason.as_deref(), &envelope.error.message)
        }
        Err(_) => ApiError::status(status, None, body.trim()),
    }
}

impl CatalogClient for YouTubeClient {
    fn list_subscriptions(
        &self,
        page_token: Option<&str>,
    ) -> Result<Page<Subscription>, ApiError> {
        let mut params = vec![("part", "snippet"), ("mine", "true"), ("maxResults", MAX_PAGE_SIZE)];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        self.get("subscriptions", &params)
    }

    fn list_activities(&self, query: &ActivityQuery<'_>) -> Result<Page<Activity>, ApiError> {
        let after = format_timestamp(&query.published_after);
        let max = query.max_results.to_string();
        self.get(
            "activities",
            &[
                ("part", "snippet,contentDetails"),
                ("channelId", query.channel_id),
                ("publishedAfter", after.as_str()),
                ("maxResults", max.as_str()),
            ],
        )
    }

    fn search_videos(&self, query: &SearchQuery<'_>) -> Result<Page<SearchResult>, ApiError> {
        let after = format_timestamp(&query.published_after);
        let max = query.max_results.to_string();
        self.get(
            "search",
            &[
                ("part", "snippet"),
                ("channelId", query.channel_id),
                ("publishedAfter", after.as_str()),
                ("type", "video"),
                ("order", "date"),
                ("maxResults", max.as_str()),
            ],
        )
    }

    fn list_playlist_items(
        &self,
        query: &PlaylistItemQuery<'_>,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>, ApiError> {
        let max = query.max_results.to_string();
        let mut params = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", query.playlist_id),
            ("maxResults", max.as_str()),
        ];
        if let Some(video_id) = query.video_id {
            params.push(("videoId", video_id));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        self.get("playlistItems", &params)
    }

    fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<PlaylistItem, ApiError> {
        let body = json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": {
                    "kind": "youtube#video",
                    "videoId": video_id,
                },
            },
        });
        self.post("playlistItems", &[("part", "snippet")], &body)
    }

    fn list_playlists(&self, page_token: Option<&str>) -> Result<Page<Playlist>, ApiError> {
        let mut params = vec![("part", "snippet,id"), ("mine", "true"), ("maxResults", MAX_PAGE_SIZE)];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        self.get("playlists", &params)
    }

    fn insert_playlist(&self, playlist: &NewPlaylist<'_>) -> Result<Playlist, ApiError> {
        let body = json!({
            "snippet": {
                "title": playlist.title,
                "description": playlist.description,
            },
            "status": {
                "privacyStatus": playlist.privacy.as_str(),
            },
        });
        self.post("playlists", &[("part", "snippet,status")], &body)
    }

    fn list_own_channels(&self) -> Result<Page<Channel>, ApiError> {
        self.get("channels", &[("part", "id"), ("mine", "true")])
    }
}
