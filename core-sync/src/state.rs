//! # Playlist Push State Machine
//!
//! Tracks what a push did to one playlist, with validated transitions.
//!
//! ```text
//! Unclassified → LocalOnly  → Created → TracksPushed
//! Unclassified → RemoteOnly → Deleted
//! Unclassified → Both       → TracksReconciled
//!                    Both   → Skipped
//! ```

use serde::{Deserialize, Serialize};

use crate::{Result, SyncError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistSyncState {
    #[default]
    Unclassified,
    LocalOnly,
    Created,
    TracksPushed,
    RemoteOnly,
    Deleted,
    Both,
    TracksReconciled,
    /// Present on both sides with no track difference
    Skipped,
}

impl PlaylistSyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistSyncState::Unclassified => "unclassified",
            PlaylistSyncState::LocalOnly => "local_only",
            PlaylistSyncState::Created => "created",
            PlaylistSyncState::TracksPushed => "tracks_pushed",
            PlaylistSyncState::RemoteOnly => "remote_only",
            PlaylistSyncState::Deleted => "deleted",
            PlaylistSyncState::Both => "both",
            PlaylistSyncState::TracksReconciled => "tracks_reconciled",
            PlaylistSyncState::Skipped => "skipped",
        }
    }

    fn can_transition_to(&self, to: PlaylistSyncState) -> bool {
        use PlaylistSyncState::*;

        matches!(
            (self, to),
            (Unclassified, LocalOnly)
                | (Unclassified, RemoteOnly)
                | (Unclassified, Both)
                | (LocalOnly, Created)
                | (Created, TracksPushed)
                | (RemoteOnly, Deleted)
                | (Both, TracksReconciled)
                | (Both, Skipped)
        )
    }

    /// Move to `to`, rejecting transitions outside the machine
    pub fn transition(self, to: PlaylistSyncState) -> Result<PlaylistSyncState> {
        if !self.can_transition_to(to) {
            return Err(SyncError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        Ok(to)
    }
}

impl std::fmt::Display for PlaylistSyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
