//! # Collection Diff
//!
//! Three-way classification of local and remote records keyed by remote
//! identity, used once for playlists and once per matched playlist for its
//! tracks.
//!
//! Each identity gets a presence code: `+1` when a local record carries it,
//! `+2` when the remote side has it.
//!
//! | Code | Group |
//! |------|-------|
//! | 1 | `local_only` (remembered id, gone remotely: treated like a new record) |
//! | 2 | `remote_only` |
//! | 3 | `both`, merged |
//!
//! Local records without an identity never match and always land in
//! `local_only`. Merged records keep the remote's content and identity and the
//! local's directory or file name.
//!
//! Ordering is deterministic: `local_only` follows local order, `remote_only`
//! and `both` follow remote order. When an identity appears twice on one side
//! the first occurrence wins; later local occurrences are kept aside in
//! `duplicates` so they can be reported.

use std::collections::{HashMap, HashSet};

use core_library::{PlaylistRecord, TrackRecord};
use tracing::warn;

use crate::{Result, SyncError};

/// A record that can take part in a three-way diff
pub trait SyncRecord: Clone {
    /// Remote identity, if any
    fn identity(&self) -> Option<&str>;

    /// Name of the local directory or file holding the record
    fn local_name(&self) -> &str;

    /// Remote content with the local presentation name
    fn merge(local: &Self, remote: &Self) -> Self;
}

impl SyncRecord for PlaylistRecord {
    fn identity(&self) -> Option<&str> {
        PlaylistRecord::identity(self)
    }

    fn local_name(&self) -> &str {
        &self.directory_name
    }

    fn merge(local: &Self, remote: &Self) -> Self {
        Self {
            id: remote.id.clone(),
            name: remote.name.clone(),
            directory_name: local.directory_name.clone(),
        }
    }
}

impl SyncRecord for TrackRecord {
    fn identity(&self) -> Option<&str> {
        TrackRecord::identity(self)
    }

    fn local_name(&self) -> &str {
        &self.file_name
    }

    fn merge(local: &Self, remote: &Self) -> Self {
        Self {
            file_name: local.file_name.clone(),
            ..remote.clone()
        }
    }
}

/// Partition of local and remote records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<T> {
    pub local_only: Vec<T>,
    pub remote_only: Vec<T>,
    pub both: Vec<T>,
    /// Local records whose identity an earlier local record already holds
    pub duplicates: Vec<T>,
}

impl<T> Default for Classification<T> {
    fn default() -> Self {
        Self {
            local_only: Vec::new(),
            remote_only: Vec::new(),
            both: Vec::new(),
            duplicates: Vec::new(),
        }
    }
}

impl<T> Classification<T> {
    /// No record exists on only one side
    pub fn is_in_sync(&self) -> bool {
        self.local_only.is_empty() && self.remote_only.is_empty()
    }
}

const LOCAL: u8 = 1;
const REMOTE: u8 = 2;

/// Classify `local` against `remote`
///
/// Remote records without an identity cannot be matched and are ignored.
pub fn classify<T: SyncRecord>(local: Vec<T>, remote: Vec<T>) -> Classification<T> {
    let mut presence: HashMap<String, u8> = HashMap::new();
    let mut local_by_id: HashMap<String, T> = HashMap::new();

    for record in &local {
        if let Some(id) = record.identity() {
            if local_by_id.contains_key(id) {
                continue;
            }
            *presence.entry(id.to_string()).or_default() |= LOCAL;
            local_by_id.insert(id.to_string(), record.clone());
        }
    }

    let mut remote_ids = HashSet::new();
    for record in &remote {
        match record.identity() {
            Some(id) => {
                if remote_ids.insert(id.to_string()) {
                    *presence.entry(id.to_string()).or_default() |= REMOTE;
                }
            }
            None => warn!("Ignoring remote record without identity"),
        }
    }

    let mut classification = Classification::default();
    let mut seen_local = HashSet::new();

    for record in local {
        match record.identity().map(str::to_string) {
            None => classification.local_only.push(record),
            Some(id) => {
                if !seen_local.insert(id.clone()) {
                    let kept = local_by_id.get(&id).map(T::local_name).unwrap_or_default();
                    warn!(
                        id = %id,
                        name = %record.local_name(),
                        kept = %kept,
                        "Duplicate local identity; keeping the first record"
                    );
                    classification.duplicates.push(record);
                } else if presence.get(&id) == Some(&LOCAL) {
                    classification.local_only.push(record);
                }
            }
        }
    }

    let mut seen_remote = HashSet::new();
    for record in remote {
        let Some(id) = record.identity().map(str::to_string) else {
            continue;
        };
        if !seen_remote.insert(id.clone()) {
            continue;
        }
        match presence.get(&id).copied() {
            Some(code) if code == LOCAL | REMOTE => {
                if let Some(local_record) = local_by_id.get(&id) {
                    classification
                        .both
                        .push(T::merge(local_record, &record));
                }
            }
            _ => classification.remote_only.push(record),
        }
    }

    classification
}

/// Remote id of a playlist whose tracks can be classified
///
/// The playlist must be materialized locally and exist remotely.
pub(crate) fn track_context(playlist: &PlaylistRecord) -> Result<&str> {
    if playlist.directory_name.is_empty() {
        return Err(SyncError::MissingPlaylistContext {
            field: "directory name",
        });
    }
    playlist
        .identity()
        .ok_or(SyncError::MissingPlaylistContext { field: "id" })
}

/// Classify the tracks of one playlist
pub fn classify_tracks(
    playlist: &PlaylistRecord,
    local: Vec<TrackRecord>,
    remote: Vec<TrackRecord>,
) -> Result<Classification<TrackRecord>> {
    track_context(playlist)?;
    Ok(classify(local, remote))
}
