//! Record models of the local collection

use bridge_traits::catalog::{RemotePlaylist, RemoteTrack};
use serde::{Deserialize, Serialize};

/// A playlist as represented locally
///
/// `directory_name` is the local key: unique (case-insensitive) among sibling
/// playlist directories. `id` is absent until the playlist exists remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub id: Option<String>,
    pub name: String,
    pub directory_name: String,
}

impl PlaylistRecord {
    /// A playlist known only by its directory
    pub fn from_directory(directory_name: impl Into<String>) -> Self {
        let directory_name = directory_name.into();
        Self {
            id: None,
            name: directory_name.clone(),
            directory_name,
        }
    }

    /// Remote id, if the playlist has a non-empty one
    pub fn identity(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A track as represented locally
///
/// `file_name` includes the record extension and is unique (case-insensitive)
/// within the playlist directory. `id` is absent until the track has been
/// matched to a remote track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: Option<String>,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_seconds: String,
    pub isrc: String,
    pub file_name: String,
}

impl TrackRecord {
    pub fn identity(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A remote playlist not yet placed in a directory
impl From<RemotePlaylist> for PlaylistRecord {
    fn from(playlist: RemotePlaylist) -> Self {
        Self {
            id: Some(playlist.id),
            name: playlist.name,
            directory_name: String::new(),
        }
    }
}

/// A remote track not yet written to a file
impl From<RemoteTrack> for TrackRecord {
    fn from(track: RemoteTrack) -> Self {
        Self {
            id: Some(track.id),
            title: track.title,
            artist: track.artist,
            album: track.album,
            duration_seconds: track.duration_seconds,
            isrc: track.isrc,
            file_name: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_directory() {
        let record = PlaylistRecord::from_directory("Chill");
        assert_eq!(record.id, None);
        assert_eq!(record.name, "Chill");
        assert_eq!(record.directory_name, "Chill");
        assert_eq!(record.identity(), None);
    }

    #[test]
    fn test_empty_id_has_no_identity() {
        let track = TrackRecord {
            id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(track.identity(), None);
    }

    #[test]
    fn test_from_remote_track() {
        let track = TrackRecord::from(RemoteTrack {
            id: "t1".to_string(),
            title: "Song".to_string(),
            artist: "A, B".to_string(),
            album: "LP".to_string(),
            duration_seconds: "201".to_string(),
            isrc: "USRC17607839".to_string(),
        });
        assert_eq!(track.identity(), Some("t1"));
        assert_eq!(track.artist, "A, B");
        assert!(track.file_name.is_empty());
    }
}
