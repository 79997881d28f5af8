//! # Sync Coordinator
//!
//! Runs the user-facing operations against a local collection and a remote
//! playlist provider.
//!
//! ## Workflow
//!
//! ### Pull
//! 1. Create the collection root
//! 2. List every remote playlist (paginated)
//! 3. Allocate a unique directory name per playlist and write its record
//! 4. List the playlist's tracks (paginated) and write one file per track
//!
//! Pull overwrites the files it allocates and never deletes anything.
//!
//! ### Push
//! 1. Classify local playlists against remote playlists
//! 2. Local-only: create the remote playlist, then add every local track
//! 3. Remote-only: delete the remote playlist
//! 4. Matched: classify tracks, add local-only ones, remove remote-only ones
//! 5. Delete orphan playlist records
//!
//! Added tracks are resolved and sent in chunks; each confirmed chunk is
//! handed to a consumer task that rewrites the local files from the remote
//! record.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{SyncConfig, SyncCoordinator};
//!
//! let coordinator = SyncCoordinator::new(local, remote, SyncConfig::default());
//! let diff = coordinator.compare().await?;
//! if !diff.is_empty() {
//!     let report = coordinator.push().await?;
//! }
//! ```

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bridge_traits::catalog::{PlaylistProvider, RemotePlaylist, RemoteTrack};
use core_async::sync::mpsc;
use core_library::{
    file_stem, track_file_name, LibraryError, LocalCollection, PlaylistRecord, TrackRecord,
};
use tracing::{debug, info, instrument, warn};

use crate::applier::{BatchApplier, ConfirmedTrack, ResolutionFailure};
use crate::diff::{classify, classify_tracks, track_context, Classification, SyncRecord};
use crate::naming::{candidate_stem, NameRegistry};
use crate::report::{
    CollectionDiff, PlaylistChanges, PlaylistOutcome, PullReport, PulledPlaylist, PushReport,
};
use crate::state::PlaylistSyncState;
use crate::{Result, SyncError};

/// Sync coordinator configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Page size when listing playlists
    pub playlist_page_size: usize,

    /// Page size when listing the tracks of a playlist
    pub track_page_size: usize,

    /// Upper bound on tracks per add/remove call. The provider's own limit
    /// applies when it is lower.
    pub chunk_size: usize,

    /// Pause between consecutive catalog searches
    pub search_delay: Duration,

    /// Confirmed chunks buffered between the applier and the file writer
    pub channel_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            playlist_page_size: 50,
            track_page_size: 100,
            chunk_size: 100,
            search_delay: Duration::from_millis(100),
            channel_capacity: 4,
        }
    }
}

pub struct SyncCoordinator {
    local: Arc<dyn LocalCollection>,
    remote: Arc<dyn PlaylistProvider>,
    config: SyncConfig,
}

impl SyncCoordinator {
    pub fn new(
        local: Arc<dyn LocalCollection>,
        remote: Arc<dyn PlaylistProvider>,
        config: SyncConfig,
    ) -> Self {
        Self {
            local,
            remote,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Materialize every remote playlist and track as local files
    #[instrument(skip(self), fields(root = %self.local.root().display()))]
    pub async fn pull(&self) -> Result<PullReport> {
        self.local.create_root_directory().await?;

        let remote_playlists = self.fetch_remote_playlists().await?;
        info!(count = remote_playlists.len(), "Fetched remote playlists");

        let mut directories = NameRegistry::new();
        let mut report = PullReport::default();

        for remote in remote_playlists {
            let remote_id = remote.id.clone();
            let directory_name = directories.take(&candidate_stem(&remote.name));
            let playlist = PlaylistRecord {
                directory_name,
                ..PlaylistRecord::from(remote)
            };

            self.local.create_playlist_directory(&playlist).await?;
            self.local.write_playlist_record(&playlist).await?;

            let mut files = NameRegistry::new();
            let mut written = Vec::new();
            for track in self.fetch_remote_tracks(&remote_id).await? {
                let stem = files.take(&candidate_stem(&track.title));
                let record = TrackRecord {
                    file_name: track_file_name(&stem),
                    ..TrackRecord::from(track)
                };
                self.local
                    .write_track_record(&playlist.directory_name, &record)
                    .await?;
                written.push(record);
            }

            info!(
                playlist = %playlist.name,
                directory = %playlist.directory_name,
                tracks = written.len(),
                "Pulled playlist"
            );
            report.playlists.push(PulledPlaylist {
                playlist,
                tracks: written,
            });
        }

        Ok(report)
    }

    /// Report what a push would change, without changing anything
    #[instrument(skip(self))]
    pub async fn compare(&self) -> Result<CollectionDiff> {
        let playlists = self.classify_playlists().await?;
        let mut diff = CollectionDiff::default();

        for playlist in playlists.local_only {
            let added = self
                .local
                .list_track_records(&playlist.directory_name)
                .await?;
            diff.local_only.push(PlaylistChanges {
                playlist,
                added,
                removed: Vec::new(),
                duplicates: Vec::new(),
            });
        }

        for playlist in playlists.remote_only {
            let removed = match playlist.identity() {
                Some(id) => self.remote_track_records(id).await?,
                None => Vec::new(),
            };
            diff.remote_only.push(PlaylistChanges {
                playlist,
                added: Vec::new(),
                removed,
                duplicates: Vec::new(),
            });
        }

        for playlist in playlists.both {
            let tracks = self.classify_playlist_tracks(&playlist).await?.0;
            diff.both.push(PlaylistChanges {
                playlist,
                added: tracks.local_only,
                removed: tracks.remote_only,
                duplicates: tracks.duplicates,
            });
        }
        diff.duplicates = playlists.duplicates;

        debug!(
            local_only = diff.local_only.len(),
            remote_only = diff.remote_only.len(),
            matched = diff.both.len(),
            "Compared collection"
        );
        Ok(diff)
    }

    /// Make the remote collection match the local one
    #[instrument(skip(self))]
    pub async fn push(&self) -> Result<PushReport> {
        let playlists = self.classify_playlists().await?;
        let mut report = PushReport {
            duplicates: playlists.duplicates,
            ..PushReport::default()
        };

        for playlist in playlists.local_only {
            report.outcomes.push(self.create_remote_playlist(playlist).await?);
        }
        for playlist in playlists.remote_only {
            report.outcomes.push(self.delete_remote_playlist(playlist).await?);
        }
        for playlist in playlists.both {
            report.outcomes.push(self.reconcile_playlist(playlist).await?);
        }

        report.cleaned = self.clean_up().await?;

        info!(
            playlists = report.outcomes.len(),
            failures = report.failure_count(),
            cleaned = report.cleaned.len(),
            "Push completed"
        );
        Ok(report)
    }

    /// Delete playlist records whose directory no longer exists
    #[instrument(skip(self))]
    pub async fn clean_up(&self) -> Result<Vec<PathBuf>> {
        clean_orphan_records(self.local.as_ref()).await
    }

    async fn fetch_remote_playlists(&self) -> Result<Vec<RemotePlaylist>> {
        let limit = self.config.playlist_page_size.max(1);
        let mut offset = 0;
        let mut playlists = Vec::new();

        loop {
            let page = self.remote.list_playlists(offset, limit).await?;
            let more = page.has_more(limit);
            offset += page.page_len;
            playlists.extend(page.items);
            if !more {
                return Ok(playlists);
            }
        }
    }

    async fn fetch_remote_tracks(&self, playlist_id: &str) -> Result<Vec<RemoteTrack>> {
        let limit = self.config.track_page_size.max(1);
        let mut offset = 0;
        let mut tracks = Vec::new();

        loop {
            let page = self
                .remote
                .list_playlist_tracks(playlist_id, offset, limit)
                .await?;
            let more = page.has_more(limit);
            offset += page.page_len;
            tracks.extend(page.items);
            if !more {
                debug!(playlist_id = %playlist_id, count = tracks.len(), "Fetched remote tracks");
                return Ok(tracks);
            }
        }
    }

    async fn remote_track_records(&self, playlist_id: &str) -> Result<Vec<TrackRecord>> {
        Ok(self
            .fetch_remote_tracks(playlist_id)
            .await?
            .into_iter()
            .map(TrackRecord::from)
            .collect())
    }

    async fn classify_playlists(&self) -> Result<Classification<PlaylistRecord>> {
        let local = self.local.local_playlists().await?;
        let remote = self
            .fetch_remote_playlists()
            .await?
            .into_iter()
            .map(PlaylistRecord::from)
            .collect();
        Ok(classify(local, remote))
    }

    /// Classify the tracks of a matched playlist
    ///
    /// Also returns every local track, which seeds file name allocation.
    /// Nothing is listed unless the playlist has both a directory and an id.
    async fn classify_playlist_tracks(
        &self,
        playlist: &PlaylistRecord,
    ) -> Result<(Classification<TrackRecord>, Vec<TrackRecord>)> {
        let id = track_context(playlist)?;
        let local = self
            .local
            .list_track_records(&playlist.directory_name)
            .await?;
        let remote = self.remote_track_records(id).await?;
        let tracks = classify_tracks(playlist, local.clone(), remote)?;
        Ok((tracks, local))
    }

    async fn create_remote_playlist(&self, local: PlaylistRecord) -> Result<PlaylistOutcome> {
        let state = PlaylistSyncState::default().transition(PlaylistSyncState::LocalOnly)?;

        let created = self.remote.create_playlist(&local.name).await?;
        info!(name = %created.name, id = %created.id, "Created remote playlist");

        let playlist = PlaylistRecord {
            id: Some(created.id.clone()),
            name: created.name,
            directory_name: local.directory_name,
        };
        self.local.write_playlist_record(&playlist).await?;
        let state = state.transition(PlaylistSyncState::Created)?;

        let tracks = self
            .local
            .list_track_records(&playlist.directory_name)
            .await?;
        let (added, failures) = self
            .add_and_rewrite(&playlist, &created.id, &tracks, tracks.clone())
            .await?;

        let mut outcome =
            PlaylistOutcome::new(playlist, state.transition(PlaylistSyncState::TracksPushed)?);
        outcome.added = added;
        outcome.failures = failures;
        Ok(outcome)
    }

    async fn delete_remote_playlist(&self, playlist: PlaylistRecord) -> Result<PlaylistOutcome> {
        let state = PlaylistSyncState::default().transition(PlaylistSyncState::RemoteOnly)?;
        if let Some(id) = playlist.identity() {
            self.remote.delete_playlist(id).await?;
            info!(name = %playlist.name, id = %id, "Deleted remote playlist");
        }
        Ok(PlaylistOutcome::new(
            playlist,
            state.transition(PlaylistSyncState::Deleted)?,
        ))
    }

    async fn reconcile_playlist(&self, playlist: PlaylistRecord) -> Result<PlaylistOutcome> {
        let state = PlaylistSyncState::default().transition(PlaylistSyncState::Both)?;
        let (mut tracks, existing) = self.classify_playlist_tracks(&playlist).await?;
        let duplicates = std::mem::take(&mut tracks.duplicates);

        if tracks.is_in_sync() {
            debug!(playlist = %playlist.name, "Playlist already in sync");
            let mut outcome =
                PlaylistOutcome::new(playlist, state.transition(PlaylistSyncState::Skipped)?);
            outcome.duplicates = duplicates;
            return Ok(outcome);
        }

        let id = playlist
            .identity()
            .map(str::to_string)
            .ok_or(SyncError::MissingPlaylistContext { field: "id" })?;

        let (added, failures) = if tracks.local_only.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            self.add_and_rewrite(&playlist, &id, &existing, tracks.local_only)
                .await?
        };

        let removed = if tracks.remote_only.is_empty() {
            Vec::new()
        } else {
            BatchApplier::new(self.remote.as_ref(), &self.config)
                .remove_tracks(&id, &tracks.remote_only)
                .await?
                .removed
        };

        info!(
            playlist = %playlist.name,
            added = added.len(),
            removed = removed.len(),
            failures = failures.len(),
            "Reconciled playlist"
        );

        let mut outcome =
            PlaylistOutcome::new(playlist, state.transition(PlaylistSyncState::TracksReconciled)?);
        outcome.added = added;
        outcome.removed = removed;
        outcome.failures = failures;
        outcome.duplicates = duplicates;
        Ok(outcome)
    }

    /// Add `to_add` remotely while a consumer task rewrites each confirmed
    /// track's local file
    ///
    /// `existing` lists every track file currently in the directory.
    async fn add_and_rewrite(
        &self,
        playlist: &PlaylistRecord,
        playlist_id: &str,
        existing: &[TrackRecord],
        to_add: Vec<TrackRecord>,
    ) -> Result<(Vec<TrackRecord>, Vec<ResolutionFailure>)> {
        let stems = existing
            .iter()
            .map(|track| file_stem(&track.file_name))
            .collect::<core_library::Result<Vec<_>>>()?;

        let writer = TrackFileWriter {
            local: Arc::clone(&self.local),
            directory_name: playlist.directory_name.clone(),
            names: NameRegistry::with_names(stems),
        };

        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let consumer = core_async::spawn(writer.run(rx));

        let produced = BatchApplier::new(self.remote.as_ref(), &self.config)
            .add_tracks(playlist_id, to_add, tx)
            .await;
        let consumed = consumer
            .await
            .map_err(|e| SyncError::Task(e.to_string()))?;

        match (produced, consumed) {
            (Ok(outcome), Ok(written)) => Ok((written, outcome.failures)),
            (Err(SyncError::ConsumerClosed), Err(e)) => Err(e),
            (Err(e), _) | (Ok(_), Err(e)) => Err(e),
        }
    }
}

/// Delete playlist records whose directory no longer exists
///
/// Needs no remote access. Returns the deleted paths in record order.
pub async fn clean_orphan_records(local: &dyn LocalCollection) -> Result<Vec<PathBuf>> {
    let directories: HashSet<String> = local
        .list_playlist_directories()
        .await?
        .into_iter()
        .collect();

    let mut visited = HashSet::new();
    let mut deleted = Vec::new();
    for record in local.list_playlist_records().await? {
        if directories.contains(&record.directory_name)
            || !visited.insert(record.directory_name.clone())
        {
            continue;
        }

        match local.delete_playlist_record(&record.directory_name).await {
            Ok(path) => {
                info!(path = %path.display(), "Removed unused playlist record");
                deleted.push(path);
            }
            Err(LibraryError::Storage { ref source, .. }) if source.is_not_found() => {
                warn!(directory = %record.directory_name, "Playlist record already gone");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(deleted)
}

/// Consumer side of the add pipeline
struct TrackFileWriter {
    local: Arc<dyn LocalCollection>,
    directory_name: String,
    names: NameRegistry,
}

impl TrackFileWriter {
    async fn run(mut self, mut rx: mpsc::Receiver<Vec<ConfirmedTrack>>) -> Result<Vec<TrackRecord>> {
        let mut written = Vec::new();
        while let Some(chunk) = rx.recv().await {
            for confirmed in chunk {
                written.push(self.rewrite(confirmed).await?);
            }
        }
        Ok(written)
    }

    /// Replace the local file of a confirmed track with the remote record,
    /// renamed after the remote title
    async fn rewrite(&mut self, confirmed: ConfirmedTrack) -> Result<TrackRecord> {
        let old = confirmed.local;
        self.names.delete(file_stem(&old.file_name)?)?;
        let stem = self.names.take(&candidate_stem(&confirmed.remote.title));

        let record = TrackRecord {
            file_name: track_file_name(&stem),
            ..confirmed.remote
        };

        if record.file_name == old.file_name {
            self.local
                .write_track_record(&self.directory_name, &record)
                .await?;
        } else if record.file_name.to_lowercase() == old.file_name.to_lowercase() {
            // Case-only rename: on case-insensitive file systems both names
            // are the same file.
            self.local
                .delete_track_record(&self.directory_name, &old)
                .await?;
            self.local
                .write_track_record(&self.directory_name, &record)
                .await?;
        } else {
            self.local
                .write_track_record(&self.directory_name, &record)
                .await?;
            self.local
                .delete_track_record(&self.directory_name, &old)
                .await?;
        }

        debug!(from = %old.file_name, to = %record.file_name, "Rewrote track file");
        Ok(record)
    }
}
