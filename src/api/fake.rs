//! In-memory catalog used by unit tests. Records every call it serves.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{
    Activity, ActivityContentDetails, ActivityQuery, ActivitySnippet, ApiError, CatalogClient,
    Channel, NewPlaylist, Page, Playlist, PlaylistItem, PlaylistItemContentDetails,
    PlaylistItemQuery, PlaylistItemSnippet, PlaylistSnippet, ResourceId, SearchQuery, SearchResult,
    SearchSnippet, Subscription, SubscriptionSnippet, UploadRef,
};

pub type Failure = fn() -> ApiError;

pub fn quota_exceeded() -> ApiError {
    ApiError::status(
        403,
        Some("quotaExceeded"),
        "The request cannot be completed because you have exceeded your quota.",
    )
}

pub fn not_found() -> ApiError {
    ApiError::status(404, Some("playlistNotFound"), "The playlist could not be found.")
}

pub fn forbidden() -> ApiError {
    ApiError::status(403, Some("forbidden"), "Access forbidden.")
}

pub fn server_error() -> ApiError {
    ApiError::status(500, Some("backendError"), "Backend Error")
}

pub fn upload(video_id: &str, title: &str, channel: &str) -> Activity {
    Activity {
        snippet: ActivitySnippet {
            kind: "upload".to_string(),
            title: title.to_string(),
            channel_title: channel.to_string(),
        },
        content_details: Some(ActivityContentDetails {
            upload: Some(UploadRef {
                video_id: video_id.to_string(),
            }),
        }),
    }
}

pub fn like(title: &str) -> Activity {
    Activity {
        snippet: ActivitySnippet {
            kind: "like".to_string(),
            title: title.to_string(),
            channel_title: String::new(),
        },
        content_details: Some(ActivityContentDetails::default()),
    }
}

pub fn search_hit(video_id: &str, title: &str, channel: &str) -> SearchResult {
    SearchResult {
        id: ResourceId {
            video_id: Some(video_id.to_string()),
            channel_id: None,
        },
        snippet: SearchSnippet {
            title: title.to_string(),
            channel_title: channel.to_string(),
        },
    }
}

pub fn playlist_entry(video_id: &str, published_at: &str) -> PlaylistItem {
    PlaylistItem {
        id: format!("item-{video_id}"),
        snippet: Some(PlaylistItemSnippet {
            published_at: Some(published_at.to_string()),
            resource_id: None,
        }),
        content_details: Some(PlaylistItemContentDetails {
            video_id: Some(video_id.to_string()),
        }),
    }
}

pub fn playlist(id: &str, title: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        snippet: PlaylistSnippet {
            title: title.to_string(),
        },
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    pub subscription_pages: Vec<Vec<String>>,
    pub subscription_error: Option<Failure>,
    pub activities: HashMap<String, Vec<Activity>>,
    pub activity_errors: HashMap<String, Failure>,
    pub searches: HashMap<String, Vec<SearchResult>>,
    pub search_errors: HashMap<String, Failure>,
    /// Pages of non-destination playlists (e.g. short-form uploads), keyed by playlist id.
    pub playlist_pages: HashMap<String, Vec<Vec<PlaylistItem>>>,
    /// `(playlist id, page index)` at which a listing fails.
    pub playlist_errors: HashMap<(String, usize), Failure>,
    pub owned_playlist_pages: Vec<Vec<Playlist>>,
    pub members: RefCell<HashMap<String, Vec<String>>>,
    pub membership_errors: HashMap<String, Failure>,
    pub insert_errors: HashMap<String, Failure>,
    pub probe_error: Option<Failure>,
    pub calls: RefCell<Vec<String>>,
    /// `(channel id, publishedAfter, maxResults)` of each activity or search lookup.
    pub windows: RefCell<Vec<(String, DateTime<Utc>, u32)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(mut self, channel_ids: &[&str]) -> Self {
        self.subscription_pages
            .push(channel_ids.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_activities(mut self, channel_id: &str, activities: Vec<Activity>) -> Self {
        self.activities.insert(channel_id.to_string(), activities);
        self
    }

    pub fn with_activity_error(mut self, channel_id: &str, failure: Failure) -> Self {
        self.activity_errors.insert(channel_id.to_string(), failure);
        self
    }

    pub fn with_search(mut self, channel_id: &str, results: Vec<SearchResult>) -> Self {
        self.searches.insert(channel_id.to_string(), results);
        self
    }

    pub fn with_search_error(mut self, channel_id: &str, failure: Failure) -> Self {
        self.search_errors.insert(channel_id.to_string(), failure);
        self
    }

    pub fn with_playlist_page(mut self, playlist_id: &str, items: Vec<PlaylistItem>) -> Self {
        self.playlist_pages
            .entry(playlist_id.to_string())
            .or_default()
            .push(items);
        self
    }

    pub fn with_playlist_error(mut self, playlist_id: &str, page: usize, failure: Failure) -> Self {
        self.playlist_errors
            .insert((playlist_id.to_string(), page), failure);
        self
    }

    pub fn with_owned_playlists(mut self, playlists: Vec<Playlist>) -> Self {
        self.owned_playlist_pages.push(playlists);
        self
    }

    pub fn with_member(self, playlist_id: &str, video_id: &str) -> Self {
        self.members
            .borrow_mut()
            .entry(playlist_id.to_string())
            .or_default()
            .push(video_id.to_string());
        self
    }

    pub fn with_insert_error(mut self, video_id: &str, failure: Failure) -> Self {
        self.insert_errors.insert(video_id.to_string(), failure);
        self
    }

    pub fn with_probe_error(mut self, failure: Failure) -> Self {
        self.probe_error = Some(failure);
        self
    }

    pub fn members_of(&self, playlist_id: &str) -> Vec<String> {
        self.members
            .borrow()
            .get(playlist_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls whose description starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn record_window(&self, channel_id: &str, since: DateTime<Utc>, max_results: u32) {
        self.windows
            .borrow_mut()
            .push((channel_id.to_string(), since, max_results));
    }
}

fn page_index(token: Option<&str>) -> usize {
    token.and_then(|t| t.parse().ok()).unwrap_or(0)
}

fn paged<T: Clone>(pages: &[Vec<T>], index: usize) -> Page<T> {
    let items = pages.get(index).cloned().unwrap_or_default();
    let next_page_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());
    Page {
        items,
        next_page_token,
    }
}

impl CatalogClient for FakeCatalog {
    fn list_subscriptions(
        &self,
        page_token: Option<&str>,
    ) -> Result<Page<Subscription>, ApiError> {
        self.record("list_subscriptions".to_string());
        if let Some(failure) = self.subscription_error {
            return Err(failure());
        }
        let page = paged(&self.subscription_pages, page_index(page_token));
        Ok(Page {
            items: page
                .items
                .into_iter()
                .map(|channel_id| Subscription {
                    snippet: SubscriptionSnippet {
                        title: String::new(),
                        resource_id: ResourceId {
                            channel_id: Some(channel_id),
                            video_id: None,
                        },
                    },
                })
                .collect(),
            next_page_token: page.next_page_token,
        })
    }

    fn list_activities(&self, query: &ActivityQuery<'_>) -> Result<Page<Activity>, ApiError> {
        self.record(format!("list_activities {}", query.channel_id));
        self.record_window(query.channel_id, query.published_after, query.max_results);
        if let Some(failure) = self.activity_errors.get(query.channel_id) {
            return Err(failure());
        }
        let mut items = self
            .activities
            .get(query.channel_id)
            .cloned()
            .unwrap_or_default();
        items.truncate(query.max_results as usize);
        Ok(Page::last(items))
    }

    fn search_videos(&self, query: &SearchQuery<'_>) -> Result<Page<SearchResult>, ApiError> {
        self.record(format!("search_videos {}", query.channel_id));
        self.record_window(query.channel_id, query.published_after, query.max_results);
        if let Some(failure) = self.search_errors.get(query.channel_id) {
            return Err(failure());
        }
        let mut items = self
            .searches
            .get(query.channel_id)
            .cloned()
            .unwrap_or_default();
        items.truncate(query.max_results as usize);
        Ok(Page::last(items))
    }

    fn list_playlist_items(
        &self,
        query: &PlaylistItemQuery<'_>,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>, ApiError> {
        if let Some(video_id) = query.video_id {
            self.record(format!("membership {} {}", query.playlist_id, video_id));
            if let Some(failure) = self.membership_errors.get(video_id) {
                return Err(failure());
            }
            let present = self.members_of(query.playlist_id).iter().any(|v| v == video_id);
            let items = if present {
                vec![PlaylistItem {
                    id: format!("item-{video_id}"),
                    ..PlaylistItem::default()
                }]
            } else {
                Vec::new()
            };
            return Ok(Page::last(items));
        }

        let index = page_index(page_token);
        self.record(format!("list_playlist_items {} {}", query.playlist_id, index));
        if let Some(failure) = self
            .playlist_errors
            .get(&(query.playlist_id.to_string(), index))
        {
            return Err(failure());
        }
        match self.playlist_pages.get(query.playlist_id) {
            Some(pages) => Ok(paged(pages, index)),
            None => Err(not_found()),
        }
    }

    fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<PlaylistItem, ApiError> {
        self.record(format!("insert_playlist_item {playlist_id} {video_id}"));
        if let Some(failure) = self.insert_errors.get(video_id) {
            return Err(failure());
        }
        self.members
            .borrow_mut()
            .entry(playlist_id.to_string())
            .or_default()
            .push(video_id.to_string());
        Ok(PlaylistItem {
            id: format!("item-{video_id}"),
            ..PlaylistItem::default()
        })
    }

    fn list_playlists(&self, page_token: Option<&str>) -> Result<Page<Playlist>, ApiError> {
        self.record("list_playlists".to_string());
        Ok(paged(&self.owned_playlist_pages, page_index(page_token)))
    }

    fn insert_playlist(&self, new: &NewPlaylist<'_>) -> Result<Playlist, ApiError> {
        self.record(format!("insert_playlist {}", new.title));
        Ok(playlist("PL_NEW", new.title))
    }

    fn list_own_channels(&self) -> Result<Page<Channel>, ApiError> {
        self.record("list_own_channels".to_string());
        match self.probe_error {
            Some(failure) => Err(failure()),
            None => Ok(Page::last(vec![Channel {
                id: "UCme".to_string(),
            }])),
        }
    }
}
