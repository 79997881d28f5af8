//! Results of the user-facing operations
//!
//! The engine never prints; callers render these.

use std::path::PathBuf;

use core_library::{PlaylistRecord, TrackRecord};

use crate::applier::ResolutionFailure;
use crate::state::PlaylistSyncState;

#[derive(Debug, Clone)]
pub struct PulledPlaylist {
    pub playlist: PlaylistRecord,
    pub tracks: Vec<TrackRecord>,
}

#[derive(Debug, Default, Clone)]
pub struct PullReport {
    pub playlists: Vec<PulledPlaylist>,
}

impl PullReport {
    pub fn track_count(&self) -> usize {
        self.playlists.iter().map(|p| p.tracks.len()).sum()
    }
}

/// Track-level difference of one playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistChanges {
    pub playlist: PlaylistRecord,
    /// Tracks present only locally
    pub added: Vec<TrackRecord>,
    /// Tracks present only remotely
    pub removed: Vec<TrackRecord>,
    /// Local track files ignored because another file holds the same id
    pub duplicates: Vec<TrackRecord>,
}

impl PlaylistChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Output of `compare`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectionDiff {
    pub local_only: Vec<PlaylistChanges>,
    pub remote_only: Vec<PlaylistChanges>,
    pub both: Vec<PlaylistChanges>,
    /// Local playlists ignored because another directory holds the same id
    pub duplicates: Vec<PlaylistRecord>,
}

impl CollectionDiff {
    pub fn is_empty(&self) -> bool {
        self.local_only.is_empty()
            && self.remote_only.is_empty()
            && self.both.iter().all(PlaylistChanges::is_empty)
    }
}

/// What a push did to one playlist
#[derive(Debug)]
pub struct PlaylistOutcome {
    pub playlist: PlaylistRecord,
    pub state: PlaylistSyncState,
    /// Tracks added remotely, with their final local file names
    pub added: Vec<TrackRecord>,
    pub removed: Vec<TrackRecord>,
    pub failures: Vec<ResolutionFailure>,
    /// Local track files left untouched because another file holds the same id
    pub duplicates: Vec<TrackRecord>,
}

impl PlaylistOutcome {
    pub(crate) fn new(playlist: PlaylistRecord, state: PlaylistSyncState) -> Self {
        Self {
            playlist,
            state,
            added: Vec::new(),
            removed: Vec::new(),
            failures: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn changed_remote(&self) -> bool {
        match self.state {
            PlaylistSyncState::Created
            | PlaylistSyncState::TracksPushed
            | PlaylistSyncState::Deleted => true,
            _ => !self.added.is_empty() || !self.removed.is_empty(),
        }
    }
}

/// Output of `push`
#[derive(Debug, Default)]
pub struct PushReport {
    pub outcomes: Vec<PlaylistOutcome>,
    /// Orphan playlist record files deleted after the push
    pub cleaned: Vec<PathBuf>,
    /// Local playlists left untouched because another directory holds the same id
    pub duplicates: Vec<PlaylistRecord>,
}

impl PushReport {
    pub fn has_changes(&self) -> bool {
        self.outcomes.iter().any(PlaylistOutcome::changed_remote)
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.failures.len()).sum()
    }
}
