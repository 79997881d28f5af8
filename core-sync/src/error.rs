use bridge_traits::error::BridgeError;
use core_library::LibraryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Local collection error: {0}")]
    Local(#[from] LibraryError),

    #[error("Remote call failed: {0}")]
    Remote(#[from] BridgeError),

    #[error("No search result for '{query}'")]
    NoSearchResult { query: String },

    #[error("Track {id} was resolved more than once in the same batch")]
    AmbiguousIdentity { id: String },

    #[error("Name '{0}' is already used")]
    NameAlreadyUsed(String),

    #[error("Name '{0}' is not registered")]
    NameNotFound(String),

    #[error("Playlist has no {field}; its tracks cannot be compared")]
    MissingPlaylistContext { field: &'static str },

    #[error("Track '{title}' has no remote identity")]
    MissingIdentity { title: String },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Track consumer stopped before all confirmed tracks were delivered")]
    ConsumerClosed,

    #[error("Task failed: {0}")]
    Task(String),
}

impl SyncError {
    /// Per-track resolution failures are reported and skipped; everything
    /// else stops the operation.
    pub fn is_item_failure(&self) -> bool {
        matches!(
            self,
            SyncError::NoSearchResult { .. } | SyncError::AmbiguousIdentity { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
