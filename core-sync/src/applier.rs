//! # Batched Mutation Applier
//!
//! Applies track additions and removals to a remote playlist without
//! exceeding the provider's per-call item limit.
//!
//! ## Add path
//!
//! Tracks that already carry an identity are used as-is. The others are
//! resolved through a metadata search (`artist:… album:… isrc:… title`),
//! taking the first hit; a miss is reported as a [`ResolutionFailure`] and the
//! batch continues. Searches run one at a time, paced by
//! [`SyncConfig::search_delay`].
//!
//! Resolved tracks are flushed in chunks. As soon as a chunk's remote call
//! succeeds, its [`ConfirmedTrack`]s are sent to the consumer channel so the
//! caller can persist them while the next chunk is in flight. A later failure
//! never undoes chunks that were already sent.
//!
//! ## Remove path
//!
//! Every track must carry an identity; the whole call is rejected with
//! [`SyncError::MissingIdentity`] before any remote call otherwise.

use std::collections::HashSet;
use std::time::Duration;

use bridge_traits::catalog::PlaylistProvider;
use core_async::sync::mpsc;
use core_async::time::sleep;
use core_library::TrackRecord;
use tracing::{debug, warn};

use crate::coordinator::SyncConfig;
use crate::diff::SyncRecord;
use crate::{Result, SyncError};

/// A track the remote side accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTrack {
    /// The record as it was read locally
    pub local: TrackRecord,
    /// The record as resolved remotely, without a file name
    pub remote: TrackRecord,
}

/// A track that could not be resolved; the rest of the batch went ahead
#[derive(Debug)]
pub struct ResolutionFailure {
    pub track: TrackRecord,
    pub error: SyncError,
}

#[derive(Debug, Default)]
pub struct AddOutcome {
    /// Resolved records, in the order they were added
    pub added: Vec<TrackRecord>,
    pub failures: Vec<ResolutionFailure>,
    pub remote_calls: usize,
}

#[derive(Debug, Default)]
pub struct RemoveOutcome {
    pub removed: Vec<TrackRecord>,
    pub remote_calls: usize,
}

enum Resolution {
    Resolved { id: String, track: TrackRecord },
    Failed(SyncError),
}

/// Search query for a track without identity
///
/// Tag filters come first, in `artist`, `album`, `isrc` order, followed by the
/// bare title. Empty fields are left out.
pub fn search_query(track: &TrackRecord) -> String {
    let tags = [
        ("artist", &track.artist),
        ("album", &track.album),
        ("isrc", &track.isrc),
    ];

    let mut parts: Vec<String> = tags
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(tag, value)| format!("{}:{}", tag, value))
        .collect();
    if !track.title.is_empty() {
        parts.push(track.title.clone());
    }
    parts.join(" ")
}

pub struct BatchApplier<'a> {
    provider: &'a dyn PlaylistProvider,
    chunk_size: usize,
    search_delay: Duration,
}

impl<'a> BatchApplier<'a> {
    pub fn new(provider: &'a dyn PlaylistProvider, config: &SyncConfig) -> Self {
        let chunk_size = config.chunk_size.min(provider.max_batch_size()).max(1);
        Self {
            provider,
            chunk_size,
            search_delay: config.search_delay,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    async fn resolve(&self, track: &TrackRecord, searches: &mut usize) -> Result<Resolution> {
        if let Some(id) = track.identity() {
            return Ok(Resolution::Resolved {
                id: id.to_string(),
                track: track.clone(),
            });
        }

        let query = search_query(track);
        if query.is_empty() {
            return Ok(Resolution::Failed(SyncError::NoSearchResult { query }));
        }

        if *searches > 0 && !self.search_delay.is_zero() {
            sleep(self.search_delay).await;
        }
        *searches += 1;

        debug!(query = %query, "Searching remote catalog");
        match self.provider.search_track(&query).await? {
            Some(found) => Ok(Resolution::Resolved {
                id: found.id.clone(),
                track: TrackRecord::from(found),
            }),
            None => Ok(Resolution::Failed(SyncError::NoSearchResult { query })),
        }
    }

    async fn flush(
        &self,
        playlist_id: &str,
        pending: &mut Vec<ConfirmedTrack>,
        sink: &mpsc::Sender<Vec<ConfirmedTrack>>,
        outcome: &mut AddOutcome,
    ) -> Result<()> {
        let chunk = std::mem::take(pending);
        let ids: Vec<String> = chunk
            .iter()
            .filter_map(|confirmed| confirmed.remote.identity().map(str::to_string))
            .collect();

        self.provider.add_tracks(playlist_id, &ids).await?;
        outcome.remote_calls += 1;
        debug!(
            playlist_id = %playlist_id,
            chunk = outcome.remote_calls,
            size = ids.len(),
            "Added chunk"
        );

        outcome
            .added
            .extend(chunk.iter().map(|confirmed| confirmed.remote.clone()));
        sink.send(chunk)
            .await
            .map_err(|_| SyncError::ConsumerClosed)
    }

    /// Add `tracks` to the playlist, streaming each confirmed chunk to `sink`
    ///
    /// The sender is dropped when this returns, which ends the consumer's
    /// receive loop.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        tracks: Vec<TrackRecord>,
        sink: mpsc::Sender<Vec<ConfirmedTrack>>,
    ) -> Result<AddOutcome> {
        let mut outcome = AddOutcome::default();
        let mut pending = Vec::with_capacity(self.chunk_size);
        let mut resolved_ids = HashSet::new();
        let mut searches = 0;

        for track in tracks {
            let (id, remote) = match self.resolve(&track, &mut searches).await? {
                Resolution::Resolved { id, track } => (id, track),
                Resolution::Failed(error) => {
                    warn!(title = %track.title, error = %error, "Could not resolve track");
                    outcome.failures.push(ResolutionFailure { track, error });
                    continue;
                }
            };

            if !resolved_ids.insert(id.clone()) {
                let error = SyncError::AmbiguousIdentity { id };
                warn!(title = %track.title, error = %error, "Skipping duplicate track");
                outcome.failures.push(ResolutionFailure { track, error });
                continue;
            }

            pending.push(ConfirmedTrack {
                local: track,
                remote,
            });
            if pending.len() == self.chunk_size {
                self.flush(playlist_id, &mut pending, &sink, &mut outcome)
                    .await?;
            }
        }

        if !pending.is_empty() {
            self.flush(playlist_id, &mut pending, &sink, &mut outcome)
                .await?;
        }

        Ok(outcome)
    }

    /// Remove `tracks` from the playlist in chunks
    pub async fn remove_tracks(
        &self,
        playlist_id: &str,
        tracks: &[TrackRecord],
    ) -> Result<RemoveOutcome> {
        let ids = tracks
            .iter()
            .map(|track| {
                track
                    .identity()
                    .map(str::to_string)
                    .ok_or_else(|| SyncError::MissingIdentity {
                        title: track.title.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut outcome = RemoveOutcome::default();
        for (chunk_ids, chunk_tracks) in ids
            .chunks(self.chunk_size)
            .zip(tracks.chunks(self.chunk_size))
        {
            self.provider.remove_tracks(playlist_id, chunk_ids).await?;
            outcome.remote_calls += 1;
            outcome.removed.extend_from_slice(chunk_tracks);
            debug!(
                playlist_id = %playlist_id,
                chunk = outcome.remote_calls,
                size = chunk_ids.len(),
                "Removed chunk"
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::catalog::{RemotePage, RemotePlaylist, RemoteTrack};
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;
    use std::sync::{Arc, Mutex};

    mock! {
        pub Provider {}

        #[async_trait]
        impl PlaylistProvider for Provider {
            async fn list_playlists(&self, offset: usize, limit: usize)
                -> BridgeResult<RemotePage<RemotePlaylist>>;
            async fn list_playlist_tracks(
                &self,
                playlist_id: &str,
                offset: usize,
                limit: usize,
            ) -> BridgeResult<RemotePage<RemoteTrack>>;
            async fn create_playlist(&self, name: &str) -> BridgeResult<RemotePlaylist>;
            async fn delete_playlist(&self, playlist_id: &str) -> BridgeResult<()>;
            async fn search_track(&self, query: &str) -> BridgeResult<Option<RemoteTrack>>;
            async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> BridgeResult<()>;
            async fn remove_tracks(&self, playlist_id: &str, track_ids: &[String])
                -> BridgeResult<()>;
            fn max_batch_size(&self) -> usize;
        }
    }

    fn provider() -> MockProvider {
        let mut provider = MockProvider::new();
        provider.expect_max_batch_size().return_const(100usize);
        provider
    }

    fn config() -> SyncConfig {
        SyncConfig {
            search_delay: Duration::ZERO,
            ..SyncConfig::default()
        }
    }

    fn known(id: &str) -> TrackRecord {
        TrackRecord {
            id: Some(id.to_string()),
            title: format!("Track {}", id),
            file_name: format!("Track {}.txt", id),
            ..Default::default()
        }
    }

    fn unknown(title: &str, artist: &str) -> TrackRecord {
        TrackRecord {
            title: title.to_string(),
            artist: artist.to_string(),
            file_name: format!("{}.txt", title),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_query() {
        let track = TrackRecord {
            title: "Song".to_string(),
            artist: "Band".to_string(),
            album: "LP".to_string(),
            isrc: "USRC1".to_string(),
            ..Default::default()
        };
        assert_eq!(search_query(&track), "artist:Band album:LP isrc:USRC1 Song");
        assert_eq!(search_query(&unknown("Only Title", "")), "Only Title");
    }

    #[test]
    fn test_chunk_size_respects_provider_limit() {
        let mut provider = MockProvider::new();
        provider.expect_max_batch_size().return_const(50usize);
        let applier = BatchApplier::new(&provider, &config());
        assert_eq!(applier.chunk_size(), 50);
    }

    #[core_async::test]
    async fn test_add_streams_each_chunk_after_its_call() {
        let (tx, rx) = mpsc::channel(4);
        let rx = Arc::new(Mutex::new(rx));
        let calls = Arc::new(Mutex::new(Vec::new()));

        let mut provider = provider();
        let observed = Arc::clone(&rx);
        let recorded = Arc::clone(&calls);
        provider
            .expect_add_tracks()
            .times(3)
            .returning(move |playlist_id, ids| {
                assert_eq!(playlist_id, "pl");
                let mut rx = observed.lock().unwrap();
                let mut delivered = 0;
                while rx.try_recv().is_ok() {
                    delivered += 1;
                }
                recorded.lock().unwrap().push((ids.len(), delivered));
                Ok(())
            });

        let tracks: Vec<_> = (0..230).map(|i| known(&format!("t{}", i))).collect();
        let applier = BatchApplier::new(&provider, &config());
        let outcome = applier.add_tracks("pl", tracks, tx).await.unwrap();

        assert_eq!(outcome.remote_calls, 3);
        assert_eq!(outcome.added.len(), 230);
        assert!(outcome.failures.is_empty());
        // Chunk k is already on the channel when call k + 1 is issued
        assert_eq!(*calls.lock().unwrap(), vec![(100, 0), (100, 1), (30, 1)]);

        let last = rx.lock().unwrap().try_recv().unwrap();
        assert_eq!(last.len(), 30);
        assert_eq!(last[0].local.id.as_deref(), Some("t200"));
    }

    #[core_async::test]
    async fn test_add_reports_search_miss_and_keeps_going() {
        let mut provider = provider();
        provider.expect_search_track().times(2).returning(|query| {
            if query.contains("Found") {
                Ok(Some(RemoteTrack {
                    id: "found-id".to_string(),
                    title: "Found (Remastered)".to_string(),
                    artist: "Band".to_string(),
                    ..Default::default()
                }))
            } else {
                Ok(None)
            }
        });
        provider
            .expect_add_tracks()
            .times(1)
            .withf(|_, ids| ids.len() == 1 && ids[0] == "found-id")
            .returning(|_, _| Ok(()));

        let (tx, mut rx) = mpsc::channel(4);
        let applier = BatchApplier::new(&provider, &config());
        let outcome = applier
            .add_tracks(
                "pl",
                vec![unknown("Found", "Band"), unknown("Missing", "Nobody")],
                tx,
            )
            .await
            .unwrap();

        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].track.title, "Missing");
        assert!(matches!(
            &outcome.failures[0].error,
            SyncError::NoSearchResult { query } if query == "artist:Nobody Missing"
        ));
        assert!(outcome.failures[0].error.is_item_failure());

        let chunk = rx.recv().await.unwrap();
        assert_eq!(chunk[0].local.file_name, "Found.txt");
        assert_eq!(chunk[0].remote.title, "Found (Remastered)");
        assert!(rx.recv().await.is_none());
    }

    #[core_async::test]
    async fn test_add_skips_duplicate_identity() {
        let mut provider = provider();
        provider
            .expect_add_tracks()
            .times(1)
            .withf(|_, ids| ids.len() == 1)
            .returning(|_, _| Ok(()));

        let (tx, _rx) = mpsc::channel(4);
        let applier = BatchApplier::new(&provider, &config());
        let outcome = applier
            .add_tracks("pl", vec![known("x"), known("x")], tx)
            .await
            .unwrap();

        assert_eq!(outcome.added.len(), 1);
        assert!(matches!(
            &outcome.failures[0].error,
            SyncError::AmbiguousIdentity { id } if id == "x"
        ));
    }

    #[core_async::test]
    async fn test_add_without_searchable_fields_fails_item() {
        let provider = provider();
        let (tx, _rx) = mpsc::channel(4);
        let applier = BatchApplier::new(&provider, &config());
        let outcome = applier
            .add_tracks("pl", vec![unknown("", "")], tx)
            .await
            .unwrap();

        assert_eq!(outcome.remote_calls, 0);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[core_async::test]
    async fn test_add_paces_searches() {
        let mut provider = provider();
        provider.expect_search_track().times(3).returning(|_| Ok(None));

        let config = SyncConfig {
            search_delay: Duration::from_millis(10),
            ..SyncConfig::default()
        };
        let (tx, _rx) = mpsc::channel(4);
        let applier = BatchApplier::new(&provider, &config);

        let started = std::time::Instant::now();
        applier
            .add_tracks(
                "pl",
                vec![unknown("a", "x"), unknown("b", "x"), unknown("c", "x")],
                tx,
            )
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[core_async::test]
    async fn test_add_fails_when_consumer_is_gone() {
        let mut provider = provider();
        provider.expect_add_tracks().returning(|_, _| Ok(()));

        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let applier = BatchApplier::new(&provider, &config());
        let result = applier.add_tracks("pl", vec![known("a")], tx).await;
        assert!(matches!(result, Err(SyncError::ConsumerClosed)));
    }

    #[core_async::test]
    async fn test_add_remote_error_is_fatal() {
        let mut provider = provider();
        provider
            .expect_add_tracks()
            .times(1)
            .returning(|_, _| Err(BridgeError::RateLimited("429".to_string())));

        let (tx, _rx) = mpsc::channel(4);
        let applier = BatchApplier::new(&provider, &config());
        let result = applier
            .add_tracks("pl", vec![known("a"), known("b")], tx)
            .await;
        assert!(matches!(result, Err(SyncError::Remote(_))));
    }

    #[core_async::test]
    async fn test_remove_chunks() {
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&sizes);

        let mut provider = provider();
        provider
            .expect_remove_tracks()
            .times(2)
            .returning(move |_, ids| {
                recorded.lock().unwrap().push(ids.len());
                Ok(())
            });

        let tracks: Vec<_> = (0..150).map(|i| known(&format!("r{}", i))).collect();
        let applier = BatchApplier::new(&provider, &config());
        let outcome = applier.remove_tracks("pl", &tracks).await.unwrap();

        assert_eq!(*sizes.lock().unwrap(), vec![100, 50]);
        assert_eq!(outcome.removed.len(), 150);
    }

    #[core_async::test]
    async fn test_remove_requires_identity() {
        let provider = provider();
        let applier = BatchApplier::new(&provider, &config());
        let result = applier
            .remove_tracks("pl", &[known("a"), unknown("Local", "x")])
            .await;

        assert!(matches!(
            result,
            Err(SyncError::MissingIdentity { title }) if title == "Local"
        ));
    }
}
