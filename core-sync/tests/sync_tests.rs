//! End-to-end sync tests: a file-backed collection in a temporary directory
//! against an in-memory playlist provider

use async_trait::async_trait;
use bridge_desktop::TokioFileSystem;
use bridge_traits::catalog::{PlaylistProvider, RemotePage, RemotePlaylist, RemoteTrack};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use core_library::FileCollection;
use core_sync::{PlaylistSyncState, SyncConfig, SyncCoordinator, SyncError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// In-memory provider
// ============================================================================

#[derive(Default)]
struct FakeState {
    playlists: Vec<(RemotePlaylist, Vec<RemoteTrack>)>,
    /// (query suffix, track) pairs answered by `search_track`
    catalog: Vec<(String, RemoteTrack)>,
    created: usize,
    add_calls: Vec<usize>,
    searches: Vec<String>,
}

struct FakeProvider {
    state: Mutex<FakeState>,
    batch_size: usize,
}

impl FakeProvider {
    fn new() -> Self {
        Self::with_batch_size(100)
    }

    fn with_batch_size(batch_size: usize) -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            batch_size,
        }
    }

    fn add_playlist(&self, id: &str, name: &str, tracks: Vec<RemoteTrack>) {
        let playlist = RemotePlaylist {
            id: id.to_string(),
            name: name.to_string(),
        };
        self.state.lock().unwrap().playlists.push((playlist, tracks));
    }

    fn remove_playlist(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .playlists
            .retain(|(p, _)| p.id != id);
    }

    fn add_to_catalog(&self, query_suffix: &str, track: RemoteTrack) {
        self.state
            .lock()
            .unwrap()
            .catalog
            .push((query_suffix.to_string(), track));
    }

    fn playlist_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.playlists.iter().map(|(p, _)| p.name.clone()).collect()
    }

    fn track_ids(&self, playlist_name: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .playlists
            .iter()
            .find(|(p, _)| p.name == playlist_name)
            .map(|(_, tracks)| tracks.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default()
    }

    fn add_calls(&self) -> Vec<usize> {
        self.state.lock().unwrap().add_calls.clone()
    }

    fn find_track(state: &FakeState, id: &str) -> RemoteTrack {
        state
            .catalog
            .iter()
            .map(|(_, t)| t)
            .chain(state.playlists.iter().flat_map(|(_, tracks)| tracks.iter()))
            .find(|t| t.id == id)
            .cloned()
            .unwrap_or_else(|| remote_track(id, id))
    }
}

fn not_found(id: &str) -> BridgeError {
    BridgeError::OperationFailed(format!("playlist {} not found", id))
}

#[async_trait]
impl PlaylistProvider for FakeProvider {
    async fn list_playlists(
        &self,
        offset: usize,
        limit: usize,
    ) -> BridgeResult<RemotePage<RemotePlaylist>> {
        let state = self.state.lock().unwrap();
        let items = state
            .playlists
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(p, _)| p.clone())
            .collect();
        Ok(RemotePage::full(items))
    }

    async fn list_playlist_tracks(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> BridgeResult<RemotePage<RemoteTrack>> {
        let state = self.state.lock().unwrap();
        let (_, tracks) = state
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or_else(|| not_found(playlist_id))?;
        Ok(RemotePage::full(
            tracks.iter().skip(offset).take(limit).cloned().collect(),
        ))
    }

    async fn create_playlist(&self, name: &str) -> BridgeResult<RemotePlaylist> {
        let mut state = self.state.lock().unwrap();
        state.created += 1;
        let playlist = RemotePlaylist {
            id: format!("created-{}", state.created),
            name: name.to_string(),
        };
        state.playlists.push((playlist.clone(), Vec::new()));
        Ok(playlist)
    }

    async fn delete_playlist(&self, playlist_id: &str) -> BridgeResult<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.playlists.len();
        state.playlists.retain(|(p, _)| p.id != playlist_id);
        if state.playlists.len() == before {
            return Err(not_found(playlist_id));
        }
        Ok(())
    }

    async fn search_track(&self, query: &str) -> BridgeResult<Option<RemoteTrack>> {
        let mut state = self.state.lock().unwrap();
        state.searches.push(query.to_string());
        Ok(state
            .catalog
            .iter()
            .find(|(suffix, _)| query.ends_with(suffix.as_str()))
            .map(|(_, t)| t.clone()))
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> BridgeResult<()> {
        let mut state = self.state.lock().unwrap();
        let tracks: Vec<RemoteTrack> = track_ids
            .iter()
            .map(|id| Self::find_track(&state, id))
            .collect();
        state.add_calls.push(track_ids.len());
        let (_, playlist_tracks) = state
            .playlists
            .iter_mut()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or_else(|| not_found(playlist_id))?;
        playlist_tracks.extend(tracks);
        Ok(())
    }

    async fn remove_tracks(&self, playlist_id: &str, track_ids: &[String]) -> BridgeResult<()> {
        let mut state = self.state.lock().unwrap();
        let (_, tracks) = state
            .playlists
            .iter_mut()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or_else(|| not_found(playlist_id))?;
        tracks.retain(|t| !track_ids.contains(&t.id));
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        self.batch_size
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn remote_track(id: &str, title: &str) -> RemoteTrack {
    RemoteTrack {
        id: id.to_string(),
        title: title.to_string(),
        artist: "Artist".to_string(),
        album: "Album".to_string(),
        duration_seconds: "200".to_string(),
        isrc: String::new(),
    }
}

struct Harness {
    _dir: TempDir,
    root: PathBuf,
    remote: Arc<FakeProvider>,
    coordinator: SyncCoordinator,
}

fn harness(remote: FakeProvider) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("spotify-fbc");
    let remote = Arc::new(remote);
    let local = Arc::new(FileCollection::new(
        Arc::new(TokioFileSystem::new()),
        root.clone(),
    ));
    let config = SyncConfig {
        playlist_page_size: 2,
        track_page_size: 2,
        search_delay: Duration::ZERO,
        ..SyncConfig::default()
    };
    let coordinator = SyncCoordinator::new(local, remote.clone(), config);
    Harness {
        _dir: dir,
        root,
        remote,
        coordinator,
    }
}

/// Every file under `root`, keyed by relative path
fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    fn walk(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, files);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                files.insert(relative, fs::read_to_string(&path).unwrap());
            }
        }
    }

    let mut files = BTreeMap::new();
    walk(root, root, &mut files);
    files
}

fn two_playlists() -> FakeProvider {
    let remote = FakeProvider::new();
    remote.add_playlist(
        "pl-a",
        "Alpha",
        vec![remote_track("t1", "One"), remote_track("t2", "Two")],
    );
    remote.add_playlist("pl-b", "Beta", vec![remote_track("t3", "Three")]);
    remote
}

// ============================================================================
// Pull
// ============================================================================

#[core_async::test]
async fn test_pull_materializes_remote_collection() {
    let remote = FakeProvider::new();
    remote.add_playlist(
        "pl-1",
        "Road Trip",
        vec![
            remote_track("t1", "Song"),
            remote_track("t2", "Song"),
            remote_track("t3", "AC/DC: Live"),
        ],
    );
    remote.add_playlist("pl-2", "road trip", Vec::new());
    remote.add_playlist("pl-3", "Chill", vec![remote_track("t4", "Calm")]);
    let h = harness(remote);

    let report = h.coordinator.pull().await.unwrap();

    assert_eq!(report.playlists.len(), 3);
    assert_eq!(report.track_count(), 4);
    let directories: Vec<&str> = report
        .playlists
        .iter()
        .map(|p| p.playlist.directory_name.as_str())
        .collect();
    assert_eq!(directories, vec!["Road Trip", "road trip 2", "Chill"]);

    let road_trip = h.root.join("Road Trip");
    assert!(road_trip.join("Song.txt").is_file());
    assert!(road_trip.join("Song 2.txt").is_file());
    assert!(road_trip.join("AC DC  Live.txt").is_file());
    assert!(h.root.join("road trip 2").is_dir());

    let record = fs::read_to_string(h.root.join("road trip 2.txt")).unwrap();
    assert_eq!(
        record,
        "NOTE: Do not delete or edit this file.\n\nid pl-2\nname road trip\ndir_name road trip 2\n"
    );

    let track = fs::read_to_string(road_trip.join("Song 2.txt")).unwrap();
    assert_eq!(
        track,
        "id t2\nname Song\nartist Artist\nalbum Album\nseconds 200\nisrc \nfile_name Song 2.txt\n"
    );
}

#[core_async::test]
async fn test_pull_twice_produces_identical_files() {
    let h = harness(two_playlists());

    h.coordinator.pull().await.unwrap();
    let first = snapshot(&h.root);
    h.coordinator.pull().await.unwrap();
    let second = snapshot(&h.root);

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

// ============================================================================
// Compare
// ============================================================================

#[core_async::test]
async fn test_compare_after_pull_has_no_difference() {
    let h = harness(two_playlists());
    h.coordinator.pull().await.unwrap();

    let diff = h.coordinator.compare().await.unwrap();
    assert!(diff.is_empty());
    assert_eq!(diff.both.len(), 2);
}

#[core_async::test]
async fn test_compare_reports_every_group() {
    let h = harness(two_playlists());
    h.coordinator.pull().await.unwrap();

    // Local edits: a brand new playlist and a deleted track
    fs::create_dir(h.root.join("New")).unwrap();
    fs::write(h.root.join("New").join("x.txt"), "name Ex\n").unwrap();
    fs::remove_file(h.root.join("Alpha").join("One.txt")).unwrap();
    // Remote edits: Beta is gone, Gamma appeared
    h.remote.remove_playlist("pl-b");
    h.remote
        .add_playlist("pl-c", "Gamma", vec![remote_track("t9", "Nine")]);

    let diff = h.coordinator.compare().await.unwrap();
    assert!(!diff.is_empty());

    let local_only: Vec<&str> = diff
        .local_only
        .iter()
        .map(|c| c.playlist.directory_name.as_str())
        .collect();
    assert_eq!(local_only, vec!["Beta", "New"]);
    assert_eq!(diff.local_only[1].added[0].title, "Ex");

    assert_eq!(diff.remote_only.len(), 1);
    assert_eq!(diff.remote_only[0].playlist.name, "Gamma");
    assert_eq!(diff.remote_only[0].removed[0].id.as_deref(), Some("t9"));

    assert_eq!(diff.both.len(), 1);
    assert!(diff.both[0].added.is_empty());
    let removed: Vec<&str> = diff.both[0]
        .removed
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(removed, vec!["One"]);
}

// ============================================================================
// Push
// ============================================================================

#[core_async::test]
async fn test_push_without_changes_skips_everything() {
    let h = harness(two_playlists());
    h.coordinator.pull().await.unwrap();
    let before = snapshot(&h.root);

    let report = h.coordinator.push().await.unwrap();

    assert!(!report.has_changes());
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.state == PlaylistSyncState::Skipped));
    assert!(report.cleaned.is_empty());
    assert!(h.remote.add_calls().is_empty());
    assert_eq!(snapshot(&h.root), before);
}

#[core_async::test]
async fn test_push_creates_playlist_and_rewrites_tracks() {
    let remote = FakeProvider::new();
    let mut pump = remote_track("pump", "Pump It (Remix)");
    pump.artist = "Black Eyed Peas".to_string();
    remote.add_to_catalog("Pump It", pump);
    let h = harness(remote);

    let workout = h.root.join("Workout");
    fs::create_dir_all(&workout).unwrap();
    fs::write(workout.join("pump.txt"), "name Pump It\nartist Black Eyed Peas\n").unwrap();
    fs::write(workout.join("nothing.txt"), "name Unknown Song\n").unwrap();

    let report = h.coordinator.push().await.unwrap();

    assert_eq!(report.outcomes.len(), 1);
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.state, PlaylistSyncState::TracksPushed);
    assert_eq!(outcome.playlist.id.as_deref(), Some("created-1"));
    assert_eq!(outcome.added.len(), 1);
    assert_eq!(outcome.added[0].file_name, "Pump It (Remix).txt");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].track.title, "Unknown Song");
    assert!(matches!(
        outcome.failures[0].error,
        SyncError::NoSearchResult { .. }
    ));

    assert_eq!(h.remote.playlist_names(), vec!["Workout"]);
    assert_eq!(h.remote.track_ids("Workout"), vec!["pump"]);

    let record = fs::read_to_string(h.root.join("Workout.txt")).unwrap();
    assert!(record.contains("id created-1\n"));
    assert!(record.contains("dir_name Workout\n"));

    assert!(!workout.join("pump.txt").exists());
    let rewritten = fs::read_to_string(workout.join("Pump It (Remix).txt")).unwrap();
    assert!(rewritten.starts_with("id pump\nname Pump It (Remix)\nartist Black Eyed Peas\n"));
    assert!(rewritten.ends_with("file_name Pump It (Remix).txt\n"));
    assert_eq!(
        fs::read_to_string(workout.join("nothing.txt")).unwrap(),
        "name Unknown Song\n"
    );

    // Second push only retries the unresolved track
    let again = h.coordinator.push().await.unwrap();
    assert_eq!(again.outcomes[0].state, PlaylistSyncState::TracksReconciled);
    assert!(again.outcomes[0].added.is_empty());
    assert_eq!(again.outcomes[0].failures.len(), 1);
    assert!(!again.has_changes());
}

#[core_async::test]
async fn test_push_rewrite_avoids_existing_file_names() {
    let remote = FakeProvider::new();
    remote.add_to_catalog("Intro", remote_track("intro-id", "Outro"));
    let h = harness(remote);

    let dir = h.root.join("Mix");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.txt"), "name Intro\n").unwrap();
    fs::write(dir.join("outro.txt"), "name Something Else\n").unwrap();

    let report = h.coordinator.push().await.unwrap();

    assert_eq!(report.outcomes[0].added[0].file_name, "Outro 2.txt");
    assert!(dir.join("Outro 2.txt").is_file());
    assert!(dir.join("outro.txt").is_file());
    assert!(!dir.join("a.txt").exists());
}

#[core_async::test]
async fn test_push_accepts_file_names_differing_only_by_case() {
    let h = harness(two_playlists());
    h.coordinator.pull().await.unwrap();

    let alpha = h.root.join("Alpha");
    fs::write(alpha.join("mix.txt"), "id t9\nname Mix\n").unwrap();
    fs::write(alpha.join("Mix.txt"), "id t8\nname Mix\n").unwrap();
    if !fs::read_to_string(alpha.join("mix.txt")).unwrap().contains("t9") {
        // Case-insensitive file system: both names are one file
        return;
    }

    let report = h.coordinator.push().await.unwrap();

    let outcome = report
        .outcomes
        .iter()
        .find(|o| o.playlist.name == "Alpha")
        .unwrap();
    assert_eq!(outcome.state, PlaylistSyncState::TracksReconciled);
    let mut added: Vec<&str> = outcome
        .added
        .iter()
        .filter_map(|t| t.id.as_deref())
        .collect();
    added.sort_unstable();
    assert_eq!(added, vec!["t8", "t9"]);
    assert!(outcome.failures.is_empty());

    let mut remote_ids = h.remote.track_ids("Alpha");
    remote_ids.sort();
    assert_eq!(remote_ids, vec!["t1", "t2", "t8", "t9"]);

    let beta = report
        .outcomes
        .iter()
        .find(|o| o.playlist.name == "Beta")
        .unwrap();
    assert_eq!(beta.state, PlaylistSyncState::Skipped);

    // Neither rewrite may clobber the other file
    let mut names: Vec<String> = fs::read_dir(&alpha)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Mix 2.txt", "Mix.txt", "One.txt", "Two.txt"]);
    let ids: Vec<bool> = ["Mix.txt", "Mix 2.txt"]
        .iter()
        .map(|name| {
            let text = fs::read_to_string(alpha.join(name)).unwrap();
            text.contains("id t8\n") || text.contains("id t9\n")
        })
        .collect();
    assert_eq!(ids, vec![true, true]);
    assert_ne!(
        fs::read_to_string(alpha.join("Mix.txt")).unwrap(),
        fs::read_to_string(alpha.join("Mix 2.txt")).unwrap()
    );
}

#[core_async::test]
async fn test_push_continues_after_unresolved_tracks() {
    let remote = two_playlists();
    remote.add_to_catalog("Fresh", remote_track("fresh", "Fresh"));
    remote.add_to_catalog("Extra", remote_track("extra", "Extra"));
    let h = harness(remote);
    h.coordinator.pull().await.unwrap();

    fs::write(h.root.join("Alpha").join("fresh.txt"), "name Fresh\n").unwrap();
    fs::write(h.root.join("Alpha").join("lost.txt"), "name Nowhere To Be Found\n").unwrap();
    fs::write(h.root.join("Beta").join("extra.txt"), "name Extra\n").unwrap();

    let report = h.coordinator.push().await.unwrap();

    let names: Vec<&str> = report
        .outcomes
        .iter()
        .map(|o| o.playlist.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);

    let alpha = &report.outcomes[0];
    assert_eq!(alpha.state, PlaylistSyncState::TracksReconciled);
    assert_eq!(alpha.added.len(), 1);
    assert_eq!(alpha.added[0].id.as_deref(), Some("fresh"));
    assert_eq!(alpha.failures.len(), 1);
    assert_eq!(alpha.failures[0].track.title, "Nowhere To Be Found");
    assert!(matches!(
        alpha.failures[0].error,
        SyncError::NoSearchResult { .. }
    ));

    let beta = &report.outcomes[1];
    assert_eq!(beta.state, PlaylistSyncState::TracksReconciled);
    assert_eq!(beta.added[0].id.as_deref(), Some("extra"));
    assert!(beta.failures.is_empty());

    assert_eq!(report.failure_count(), 1);
    assert_eq!(h.remote.track_ids("Alpha"), vec!["t1", "t2", "fresh"]);
    assert_eq!(h.remote.track_ids("Beta"), vec!["t3", "extra"]);
    assert!(h.root.join("Beta").join("Extra.txt").is_file());
}

#[core_async::test]
async fn test_copied_track_file_is_reported_not_pushed() {
    let h = harness(two_playlists());
    h.coordinator.pull().await.unwrap();
    let alpha = h.root.join("Alpha");
    fs::copy(alpha.join("One.txt"), alpha.join("zz copy.txt")).unwrap();

    let diff = h.coordinator.compare().await.unwrap();
    assert!(diff.is_empty());
    let changes = diff
        .both
        .iter()
        .find(|c| c.playlist.name == "Alpha")
        .unwrap();
    assert_eq!(changes.duplicates.len(), 1);
    assert_eq!(changes.duplicates[0].file_name, "zz copy.txt");

    let report = h.coordinator.push().await.unwrap();
    let outcome = report
        .outcomes
        .iter()
        .find(|o| o.playlist.name == "Alpha")
        .unwrap();
    assert_eq!(outcome.state, PlaylistSyncState::Skipped);
    assert_eq!(outcome.duplicates[0].file_name, "zz copy.txt");
    assert!(!report.has_changes());
    assert!(h.remote.add_calls().is_empty());
    assert!(alpha.join("zz copy.txt").is_file());
}

#[core_async::test]
async fn test_push_respects_provider_batch_size() {
    let h = harness(FakeProvider::with_batch_size(2));

    let dir = h.root.join("Big");
    fs::create_dir_all(&dir).unwrap();
    for n in 1..=5 {
        fs::write(
            dir.join(format!("{}.txt", n)),
            format!("id id-{}\nname Track {}\n", n, n),
        )
        .unwrap();
    }

    let report = h.coordinator.push().await.unwrap();

    assert_eq!(h.remote.add_calls(), vec![2, 2, 1]);
    assert_eq!(report.outcomes[0].added.len(), 5);
    assert_eq!(
        h.remote.track_ids("Big"),
        vec!["id-1", "id-2", "id-3", "id-4", "id-5"]
    );
    // Known ids are added without searching
    assert!(h.remote.state.lock().unwrap().searches.is_empty());
}

#[core_async::test]
async fn test_push_deletes_remote_only_playlist_and_cleans_record() {
    let h = harness(two_playlists());
    h.coordinator.pull().await.unwrap();
    fs::remove_dir_all(h.root.join("Beta")).unwrap();

    let report = h.coordinator.push().await.unwrap();

    let deleted = report
        .outcomes
        .iter()
        .find(|o| o.playlist.name == "Beta")
        .unwrap();
    assert_eq!(deleted.state, PlaylistSyncState::Deleted);
    assert!(report.has_changes());
    assert_eq!(h.remote.playlist_names(), vec!["Alpha"]);
    assert_eq!(report.cleaned, vec![h.root.join("Beta.txt")]);
    assert!(!h.root.join("Beta.txt").exists());
}

#[core_async::test]
async fn test_push_reconciles_matched_playlist() {
    let remote = two_playlists();
    remote.add_to_catalog("Fresh", remote_track("fresh", "Fresh"));
    let h = harness(remote);
    h.coordinator.pull().await.unwrap();

    let alpha = h.root.join("Alpha");
    fs::remove_file(alpha.join("Two.txt")).unwrap();
    fs::write(alpha.join("new.txt"), "name Fresh\n").unwrap();

    let report = h.coordinator.push().await.unwrap();

    let outcome = report
        .outcomes
        .iter()
        .find(|o| o.playlist.name == "Alpha")
        .unwrap();
    assert_eq!(outcome.state, PlaylistSyncState::TracksReconciled);
    assert_eq!(outcome.added[0].id.as_deref(), Some("fresh"));
    assert_eq!(outcome.removed[0].id.as_deref(), Some("t2"));
    assert_eq!(h.remote.track_ids("Alpha"), vec!["t1", "fresh"]);
    assert!(alpha.join("Fresh.txt").is_file());
    assert!(!alpha.join("new.txt").exists());

    let diff = h.coordinator.compare().await.unwrap();
    assert!(diff.is_empty());
}

#[core_async::test]
async fn test_push_recreates_playlist_deleted_remotely() {
    let h = harness(two_playlists());
    h.coordinator.pull().await.unwrap();
    h.remote.remove_playlist("pl-b");

    let report = h.coordinator.push().await.unwrap();

    let outcome = report
        .outcomes
        .iter()
        .find(|o| o.playlist.directory_name == "Beta")
        .unwrap();
    assert_eq!(outcome.state, PlaylistSyncState::TracksPushed);
    assert_eq!(outcome.playlist.id.as_deref(), Some("created-1"));
    assert_eq!(h.remote.track_ids("Beta"), vec!["t3"]);
}

// ============================================================================
// Clean
// ============================================================================

#[core_async::test]
async fn test_clean_up_removes_only_orphan_records() {
    let h = harness(two_playlists());
    h.coordinator.pull().await.unwrap();
    fs::write(
        h.root.join("Gone.txt"),
        "NOTE: Do not delete or edit this file.\n\nid x\nname Gone\ndir_name Gone\n",
    )
    .unwrap();

    let cleaned = h.coordinator.clean_up().await.unwrap();

    assert_eq!(cleaned, vec![h.root.join("Gone.txt")]);
    assert!(h.root.join("Alpha.txt").is_file());
    assert!(h.root.join("Beta.txt").is_file());
    assert!(h.coordinator.clean_up().await.unwrap().is_empty());
}
