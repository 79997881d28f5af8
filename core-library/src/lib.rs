//! # Local Playlist Library
//!
//! Owns the on-disk representation of the playlist collection.
//!
//! ## Overview
//!
//! The collection root holds one directory per playlist plus one
//! `<directory>.txt` record file per playlist describing its remote identity.
//! Each playlist directory holds one `.txt` record file per track:
//!
//! ```text
//! spotify-fbc/
//! ├── Road Trip.txt          # id, name, dir_name
//! └── Road Trip/
//!     ├── Highway Song.txt   # id, name, artist, album, seconds, isrc, file_name
//!     └── Highway Song 2.txt
//! ```
//!
//! This module provides:
//! - Record models ([`PlaylistRecord`], [`TrackRecord`])
//! - The `key value` text codec ([`record`])
//! - The [`LocalCollection`] abstraction and its file-backed implementation

pub mod collection;
pub mod error;
pub mod models;
pub mod record;

pub use collection::{FileCollection, LocalCollection};
pub use error::{LibraryError, Result};
pub use models::{PlaylistRecord, TrackRecord};
pub use record::{file_stem, track_file_name, TextRecord, TRACK_FILE_EXTENSION};
