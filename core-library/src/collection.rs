//! Local collection access
//!
//! [`LocalCollection`] is what the sync engine consumes; [`FileCollection`]
//! implements it over the [`FileSystemAccess`] bridge.

use async_trait::async_trait;
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{LibraryError, Result};
use crate::models::{PlaylistRecord, TrackRecord};
use crate::record::{TextRecord, TRACK_FILE_EXTENSION};

/// Directory names at the root that are never playlists
const IGNORED_DIRECTORIES: &[&str] = &[".git"];

#[async_trait]
pub trait LocalCollection: Send + Sync {
    /// Root directory of the collection
    fn root(&self) -> &Path;

    /// Create the root directory; an existing root is fine
    async fn create_root_directory(&self) -> Result<()>;

    /// Names of the playlist directories under the root
    async fn list_playlist_directories(&self) -> Result<Vec<String>>;

    /// Playlist record files at the root
    ///
    /// Text files without a `dir_name` are not playlist records and are
    /// skipped.
    async fn list_playlist_records(&self) -> Result<Vec<PlaylistRecord>>;

    /// Track records of one playlist directory
    ///
    /// The on-disk file name always wins over a stored `file_name`.
    async fn list_track_records(&self, directory_name: &str) -> Result<Vec<TrackRecord>>;

    /// Write `<root>/<directory_name>.txt`
    async fn write_playlist_record(&self, playlist: &PlaylistRecord) -> Result<()>;

    /// Create `<root>/<directory_name>`; an existing directory is fine
    async fn create_playlist_directory(&self, playlist: &PlaylistRecord) -> Result<()>;

    async fn write_track_record(&self, directory_name: &str, track: &TrackRecord) -> Result<()>;

    async fn delete_track_record(&self, directory_name: &str, track: &TrackRecord) -> Result<()>;

    /// Delete `<root>/<directory_name>.txt`, returning the deleted path
    async fn delete_playlist_record(&self, directory_name: &str) -> Result<PathBuf>;

    /// Every playlist directory joined to its record file
    ///
    /// A directory without a record is a playlist created by hand: it has no
    /// identity and is named after its directory.
    async fn local_playlists(&self) -> Result<Vec<PlaylistRecord>> {
        let directories = self.list_playlist_directories().await?;
        let mut records: HashMap<String, PlaylistRecord> = self
            .list_playlist_records()
            .await?
            .into_iter()
            .map(|record| (record.directory_name.clone(), record))
            .collect();

        Ok(directories
            .into_iter()
            .map(|directory| {
                records
                    .remove(&directory)
                    .unwrap_or_else(|| PlaylistRecord::from_directory(directory))
            })
            .collect())
    }
}

/// File-backed local collection
pub struct FileCollection {
    fs: Arc<dyn FileSystemAccess>,
    root: PathBuf,
}

impl FileCollection {
    pub fn new(fs: Arc<dyn FileSystemAccess>, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    fn playlist_record_path(&self, directory_name: &str) -> PathBuf {
        self.root
            .join(format!("{}{}", directory_name, TRACK_FILE_EXTENSION))
    }

    /// Record files (`*.txt`, not directories) directly inside `dir`
    async fn record_files(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>> {
        let entries = self
            .fs
            .list_directory(dir)
            .await
            .map_err(LibraryError::storage("read directory", dir))?;

        let mut files = Vec::new();
        for path in entries {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(TRACK_FILE_EXTENSION) {
                continue;
            }
            let metadata = self
                .fs
                .metadata(&path)
                .await
                .map_err(LibraryError::storage("stat", &path))?;
            if metadata.is_directory {
                continue;
            }
            files.push((name.to_string(), path));
        }
        Ok(files)
    }

    async fn ensure_directory(&self, path: &Path) -> Result<bool> {
        match self.fs.create_dir(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_already_exists() => Ok(false),
            Err(e) => Err(LibraryError::storage("create directory", path)(e)),
        }
    }
}

#[async_trait]
impl LocalCollection for FileCollection {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn create_root_directory(&self) -> Result<()> {
        if !self.ensure_directory(&self.root).await? {
            debug!(root = %self.root.display(), "Root directory already exists");
        }
        Ok(())
    }

    async fn list_playlist_directories(&self) -> Result<Vec<String>> {
        let entries = self
            .fs
            .list_directory(&self.root)
            .await
            .map_err(LibraryError::storage("read directory", &self.root))?;

        let mut directories = Vec::new();
        for path in entries {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if IGNORED_DIRECTORIES.contains(&name) {
                continue;
            }
            let metadata = self
                .fs
                .metadata(&path)
                .await
                .map_err(LibraryError::storage("stat", &path))?;
            if metadata.is_directory {
                directories.push(name.to_string());
            }
        }
        Ok(directories)
    }

    async fn list_playlist_records(&self) -> Result<Vec<PlaylistRecord>> {
        let mut records = Vec::new();
        for (name, path) in self.record_files(&self.root).await? {
            let text = self
                .fs
                .read_to_string(&path)
                .await
                .map_err(LibraryError::storage("read file", &path))?;
            let record = PlaylistRecord::unmarshal(&text);
            if record.directory_name.is_empty() {
                debug!(file = %name, "Skipping text file without dir_name");
                continue;
            }
            records.push(record);
        }
        Ok(records)
    }

    async fn list_track_records(&self, directory_name: &str) -> Result<Vec<TrackRecord>> {
        let dir = self.root.join(directory_name);
        let mut tracks = Vec::new();
        for (name, path) in self.record_files(&dir).await? {
            let text = self
                .fs
                .read_to_string(&path)
                .await
                .map_err(LibraryError::storage("read file", &path))?;
            let mut track = TrackRecord::unmarshal(&text);
            if track.file_name.is_empty() {
                // Hand-written records usually lack file_name
                track.file_name = name;
            } else if track.file_name != name {
                warn!(
                    stored = %track.file_name,
                    on_disk = %name,
                    playlist = %directory_name,
                    "file_name property does not match the file; using the file name"
                );
                track.file_name = name;
            }
            tracks.push(track);
        }
        Ok(tracks)
    }

    async fn write_playlist_record(&self, playlist: &PlaylistRecord) -> Result<()> {
        let path = self.playlist_record_path(&playlist.directory_name);
        self.fs
            .write_file(&path, Bytes::from(playlist.marshal()))
            .await
            .map_err(LibraryError::storage("write", &path))
    }

    async fn create_playlist_directory(&self, playlist: &PlaylistRecord) -> Result<()> {
        let path = self.root.join(&playlist.directory_name);
        if !self.ensure_directory(&path).await? {
            info!(playlist = %playlist.name, "Playlist directory is already created");
        }
        Ok(())
    }

    async fn write_track_record(&self, directory_name: &str, track: &TrackRecord) -> Result<()> {
        let path = self.root.join(directory_name).join(&track.file_name);
        self.fs
            .write_file(&path, Bytes::from(track.marshal()))
            .await
            .map_err(LibraryError::storage("write", &path))
    }

    async fn delete_track_record(&self, directory_name: &str, track: &TrackRecord) -> Result<()> {
        let path = self.root.join(directory_name).join(&track.file_name);
        self.fs
            .delete_file(&path)
            .await
            .map_err(LibraryError::storage("remove", &path))
    }

    async fn delete_playlist_record(&self, directory_name: &str) -> Result<PathBuf> {
        let path = self.playlist_record_path(directory_name);
        self.fs
            .delete_file(&path)
            .await
            .map_err(LibraryError::storage("remove", &path))?;
        Ok(path)
    }
}
