//! Spotify Web API connector implementation
//!
//! Implements the `PlaylistProvider` trait against the Spotify Web API v1.

use async_trait::async_trait;
use bridge_traits::catalog::{PlaylistProvider, RemotePage, RemotePlaylist, RemoteTrack};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use core_async::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SpotifyError};
use crate::types::{
    AddTracksRequest, CreatePlaylistRequest, CurrentUser, ErrorResponse, Paging, PlaylistItem,
    RemoveTracksRequest, SearchResponse, SpotifyPlaylist, SpotifyTrack, TrackUri,
};

/// Spotify Web API base URL
const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Maximum track URIs per add/remove request (Spotify API limit)
const MAX_TRACKS_PER_REQUEST: usize = 100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Spotify Web API connector
///
/// Implements `PlaylistProvider` for the current user's library.
///
/// # Features
///
/// - Offset/limit pagination over playlists and playlist items
/// - Playlist creation under the current user (user id is fetched once)
/// - Deletion by unfollowing the playlist
/// - Catalog search with `artist:`/`album:`/`isrc:` filters
/// - Retry on 429 and 5xx via the `HttpClient` retry policy
///
/// # Example
///
/// ```ignore
/// use provider_spotify::SpotifyConnector;
/// use bridge_traits::catalog::PlaylistProvider;
///
/// let connector = SpotifyConnector::new(http_client, access_token);
/// let page = connector.list_playlists(0, 50).await?;
/// ```
pub struct SpotifyConnector {
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token with playlist read/modify scopes
    access_token: String,

    base_url: String,
    timeout: Duration,
    retry_policy: RetryPolicy,

    /// Current user's id, needed to create playlists
    user_id: OnceCell<String>,
}

impl SpotifyConnector {
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: impl Into<String>) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
            base_url: SPOTIFY_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
            user_id: OnceCell::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .bearer_token(self.access_token.as_str())
            .header("Accept", "application/json")
            .timeout(self.timeout)
    }

    /// Execute a request and map non-2xx statuses to errors
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self
            .http_client
            .execute_with_retry(request, self.retry_policy.clone())
            .await?;

        if response.is_success() {
            debug!(status = response.status, "API request succeeded");
            return Ok(response);
        }

        let message = Self::error_message(&response);
        warn!(status = response.status, message = %message, "API request failed");
        Err(match response.status {
            401 | 403 => SpotifyError::AuthenticationFailed(message),
            429 => SpotifyError::RateLimitExceeded(message),
            status_code => SpotifyError::ApiError {
                status_code,
                message,
            },
        })
    }

    fn error_message(response: &HttpResponse) -> String {
        match response.json::<ErrorResponse>() {
            Ok(body) if !body.error.message.is_empty() => body.error.message,
            _ => String::from_utf8_lossy(&response.body).into_owned(),
        }
    }

    fn parse<T: DeserializeOwned>(response: &HttpResponse, what: &str) -> Result<T> {
        serde_json::from_slice(&response.body)
            .map_err(|e| SpotifyError::ParseError(format!("Failed to parse {}: {}", what, e)))
    }

    async fn current_user_id(&self) -> Result<&str> {
        let id = self
            .user_id
            .get_or_try_init(|| async {
                let response = self.send(self.request(HttpMethod::Get, "/me")).await?;
                let user: CurrentUser = Self::parse(&response, "current user")?;
                debug!(user_id = %user.id, "Resolved current user");
                Ok::<_, SpotifyError>(user.id)
            })
            .await?;
        Ok(id.as_str())
    }

    /// Convert an API track; tracks without a catalog id are dropped
    fn convert_track(track: SpotifyTrack) -> Option<RemoteTrack> {
        let id = track.id.filter(|id| !id.is_empty())?;
        let artist = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Some(RemoteTrack {
            id,
            title: track.name,
            artist,
            album: track.album.map(|a| a.name).unwrap_or_default(),
            duration_seconds: (track.duration_ms / 1000).to_string(),
            isrc: track.external_ids.isrc.unwrap_or_default(),
        })
    }

    fn track_uri(id: &str) -> String {
        format!("spotify:track:{}", id)
    }

    fn playlist_path(playlist_id: &str, suffix: &str) -> String {
        format!("/playlists/{}{}", urlencoding::encode(playlist_id), suffix)
    }
}

#[async_trait]
impl PlaylistProvider for SpotifyConnector {
    #[instrument(skip(self))]
    async fn list_playlists(
        &self,
        offset: usize,
        limit: usize,
    ) -> bridge_traits::error::Result<RemotePage<RemotePlaylist>> {
        let path = format!("/me/playlists?offset={}&limit={}", offset, limit);
        let response = self.send(self.request(HttpMethod::Get, &path)).await?;
        let page: Paging<SpotifyPlaylist> = Self::parse(&response, "playlist page")?;

        let page_len = page.items.len();
        let items = page
            .items
            .into_iter()
            .map(|p| RemotePlaylist {
                id: p.id,
                name: p.name,
            })
            .collect();

        debug!(count = page_len, total = page.total, "Listed playlists");
        Ok(RemotePage { items, page_len })
    }

    #[instrument(skip(self))]
    async fn list_playlist_tracks(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> bridge_traits::error::Result<RemotePage<RemoteTrack>> {
        let path = Self::playlist_path(
            playlist_id,
            &format!("/tracks?offset={}&limit={}", offset, limit),
        );
        let response = self.send(self.request(HttpMethod::Get, &path)).await?;
        let page: Paging<PlaylistItem> = Self::parse(&response, "playlist items")?;

        let page_len = page.items.len();
        let items: Vec<RemoteTrack> = page
            .items
            .into_iter()
            .filter_map(|item| item.track.and_then(Self::convert_track))
            .collect();

        if items.len() < page_len {
            debug!(
                skipped = page_len - items.len(),
                "Skipped unavailable or local-only playlist items"
            );
        }
        Ok(RemotePage { items, page_len })
    }

    #[instrument(skip(self))]
    async fn create_playlist(&self, name: &str) -> bridge_traits::error::Result<RemotePlaylist> {
        let user_id = self.current_user_id().await?;
        let path = format!("/users/{}/playlists", urlencoding::encode(user_id));
        let request = self
            .request(HttpMethod::Post, &path)
            .json(&CreatePlaylistRequest {
                name,
                public: false,
            })?;

        let response = self.send(request).await?;
        let created: SpotifyPlaylist = Self::parse(&response, "created playlist")?;
        info!(id = %created.id, name = %created.name, "Created playlist");

        Ok(RemotePlaylist {
            id: created.id,
            name: created.name,
        })
    }

    #[instrument(skip(self))]
    async fn delete_playlist(&self, playlist_id: &str) -> bridge_traits::error::Result<()> {
        let path = Self::playlist_path(playlist_id, "/followers");
        self.send(self.request(HttpMethod::Delete, &path)).await?;
        info!(id = %playlist_id, "Unfollowed playlist");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search_track(&self, query: &str) -> bridge_traits::error::Result<Option<RemoteTrack>> {
        let path = format!("/search?q={}&type=track&limit=1", urlencoding::encode(query));
        let response = self.send(self.request(HttpMethod::Get, &path)).await?;
        let result: SearchResponse = Self::parse(&response, "search result")?;

        Ok(result
            .tracks
            .items
            .into_iter()
            .find_map(Self::convert_track))
    }

    #[instrument(skip(self, track_ids), fields(count = track_ids.len()))]
    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> bridge_traits::error::Result<()> {
        let path = Self::playlist_path(playlist_id, "/tracks");
        for chunk in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = AddTracksRequest {
                uris: chunk.iter().map(|id| Self::track_uri(id)).collect(),
            };
            let request = self.request(HttpMethod::Post, &path).json(&body)?;
            self.send(request).await?;
        }
        Ok(())
    }

    #[instrument(skip(self, track_ids), fields(count = track_ids.len()))]
    async fn remove_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> bridge_traits::error::Result<()> {
        let path = Self::playlist_path(playlist_id, "/tracks");
        for chunk in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = RemoveTracksRequest {
                tracks: chunk
                    .iter()
                    .map(|id| TrackUri {
                        uri: Self::track_uri(id),
                    })
                    .collect(),
            };
            let request = self.request(HttpMethod::Delete, &path).json(&body)?;
            self.send(request).await?;
        }
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        MAX_TRACKS_PER_REQUEST
    }
}
