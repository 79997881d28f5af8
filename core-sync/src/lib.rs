//! # Playlist Sync Engine
//!
//! Reconciles the local file collection with a remote playlist provider.
//!
//! ## Components
//!
//! - **Naming** (`naming`): File-system-safe, case-insensitively unique names
//! - **Diff** (`diff`): Three-way classification of local and remote records
//! - **State** (`state`): Per-playlist lifecycle during a push
//! - **Batched Applier** (`applier`): Resolves tracks and adds/removes them in chunks
//! - **Sync Coordinator** (`coordinator`): `pull`, `compare`, `push` and `clean_up`
//! - **Reports** (`report`): What each operation found or changed

pub mod applier;
pub mod coordinator;
pub mod diff;
pub mod error;
pub mod naming;
pub mod report;
pub mod state;

pub use applier::{
    search_query, AddOutcome, BatchApplier, ConfirmedTrack, RemoveOutcome, ResolutionFailure,
};
pub use coordinator::{clean_orphan_records, SyncConfig, SyncCoordinator};
pub use diff::{classify, classify_tracks, Classification, SyncRecord};
pub use error::{Result, SyncError};
pub use naming::{candidate_stem, sanitize_stem, NameRegistry, UNTITLED_STEM};
pub use report::{
    CollectionDiff, PlaylistChanges, PlaylistOutcome, PullReport, PulledPlaylist, PushReport,
};
pub use state::PlaylistSyncState;
