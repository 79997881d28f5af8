//! Spotify Web API response types
//!
//! Only the fields the connector reads are modelled.

use serde::{Deserialize, Serialize};

/// See: https://developer.spotify.com/documentation/web-api/reference/get-current-users-profile
#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

/// Simplified playlist object
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
}

/// Generic paging object
///
/// See: https://developer.spotify.com/documentation/web-api/concepts/api-calls#paging
#[derive(Debug, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,

    #[serde(default)]
    pub total: usize,

    #[serde(default)]
    pub next: Option<String>,
}

/// Entry of a playlist's track list
///
/// `track` is null for items that are no longer available.
#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    /// Null for local files added from the desktop app
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,

    #[serde(default)]
    pub album: Option<SpotifyAlbum>,

    #[serde(default)]
    pub duration_ms: u64,

    #[serde(default)]
    pub external_ids: ExternalIds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub isrc: Option<String>,
}

/// `GET /search?type=track` response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<SpotifyTrack>,
}

/// `POST /users/{user_id}/playlists` body
#[derive(Debug, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
}

/// `POST /playlists/{id}/tracks` body
#[derive(Debug, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

/// `DELETE /playlists/{id}/tracks` body
#[derive(Debug, Serialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

/// Error object returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}
