//! Remote Playlist Catalog Abstraction
//!
//! The remote collection service (a streaming provider's playlist API) seen
//! through the operations the sync engine consumes. Pagination is exposed as
//! offset/limit pages; looping over pages is the caller's job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A playlist as the remote service reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePlaylist {
    /// Service-assigned identity
    pub id: String,
    /// Display name
    pub name: String,
}

/// A track as the remote service reports it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteTrack {
    pub id: String,
    pub title: String,
    /// Artist names joined with `", "`
    pub artist: String,
    pub album: String,
    /// Whole seconds, rendered as text
    pub duration_seconds: String,
    pub isrc: String,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage<T> {
    /// Usable entries of this page
    pub items: Vec<T>,
    /// Number of entries the service returned for this page, including
    /// entries dropped from `items` because they cannot be represented
    /// (e.g. local files without an identity). Pagination stops when this is
    /// smaller than the requested limit.
    pub page_len: usize,
}

impl<T> RemotePage<T> {
    /// A page where every returned entry was usable
    pub fn full(items: Vec<T>) -> Self {
        let page_len = items.len();
        Self { items, page_len }
    }

    /// Whether another page may follow a request of `limit` entries
    pub fn has_more(&self, limit: usize) -> bool {
        limit > 0 && self.page_len >= limit
    }
}

/// Remote playlist collection trait
///
/// Implementations map these calls onto a concrete web API. Every method is a
/// network call and may fail with a rate-limit or transport error; the engine
/// treats those as fatal for the operation in progress.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::catalog::PlaylistProvider;
///
/// async fn first_page(provider: &dyn PlaylistProvider) -> Result<usize> {
///     let page = provider.list_playlists(0, 50).await?;
///     Ok(page.items.len())
/// }
/// ```
#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    /// List the current user's playlists starting at `offset`
    async fn list_playlists(&self, offset: usize, limit: usize)
        -> Result<RemotePage<RemotePlaylist>>;

    /// List the tracks of a playlist starting at `offset`
    async fn list_playlist_tracks(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<RemotePage<RemoteTrack>>;

    /// Create a playlist; the service assigns its identity
    async fn create_playlist(&self, name: &str) -> Result<RemotePlaylist>;

    /// Delete (or unfollow) a playlist
    async fn delete_playlist(&self, playlist_id: &str) -> Result<()>;

    /// Search for a track and return the best match, if any
    ///
    /// Search endpoints are usually subject to a stricter rate limit than
    /// identity-based calls; callers should pace sequential searches.
    async fn search_track(&self, query: &str) -> Result<Option<RemoteTrack>>;

    /// Append tracks to a playlist
    ///
    /// `track_ids.len()` must not exceed [`max_batch_size`](Self::max_batch_size).
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    /// Remove every occurrence of the given tracks from a playlist
    ///
    /// `track_ids.len()` must not exceed [`max_batch_size`](Self::max_batch_size).
    async fn remove_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    /// Largest number of items accepted by one add/remove call
    fn max_batch_size(&self) -> usize {
        100
    }
}
