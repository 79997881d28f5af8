//! Text record codec
//!
//! Records are stored as one `key value` pair per line. Each record type
//! declares an ordered table of keys with accessor functions; marshalling
//! walks the table, unmarshalling looks keys up in it.
//!
//! - Lines without a space are ignored.
//! - Unknown keys are ignored.
//! - Missing keys leave the field at its default.
//! - An empty `id` value decodes to `None`.

use crate::error::{LibraryError, Result};
use crate::models::{PlaylistRecord, TrackRecord};

/// Extension of every record file
pub const TRACK_FILE_EXTENSION: &str = ".txt";

/// One serialized field of a record
pub struct Field<R> {
    pub key: &'static str,
    pub get: fn(&R) -> &str,
    pub set: fn(&mut R, String),
}

/// A record with a fixed text representation
pub trait TextRecord: Default + Sized + 'static {
    /// Text written before the first field
    const HEADER: &'static str = "";

    /// Serialized fields, in output order
    fn fields() -> &'static [Field<Self>];

    fn marshal(&self) -> String {
        let mut text = String::from(Self::HEADER);
        for field in Self::fields() {
            text.push_str(field.key);
            text.push(' ');
            text.push_str((field.get)(self));
            text.push('\n');
        }
        text
    }

    fn unmarshal(text: &str) -> Self {
        let mut record = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once(' ') else {
                continue;
            };
            if let Some(field) = Self::fields().iter().find(|f| f.key == key) {
                (field.set)(&mut record, value.to_string());
            }
        }
        record
    }
}

fn identity(id: &Option<String>) -> &str {
    id.as_deref().unwrap_or("")
}

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

static PLAYLIST_FIELDS: &[Field<PlaylistRecord>] = &[
    Field {
        key: "id",
        get: |r| identity(&r.id),
        set: |r, v| r.id = optional(v),
    },
    Field {
        key: "name",
        get: |r| r.name.as_str(),
        set: |r, v| r.name = v,
    },
    Field {
        key: "dir_name",
        get: |r| r.directory_name.as_str(),
        set: |r, v| r.directory_name = v,
    },
];

static TRACK_FIELDS: &[Field<TrackRecord>] = &[
    Field {
        key: "id",
        get: |r| identity(&r.id),
        set: |r, v| r.id = optional(v),
    },
    Field {
        key: "name",
        get: |r| r.title.as_str(),
        set: |r, v| r.title = v,
    },
    Field {
        key: "artist",
        get: |r| r.artist.as_str(),
        set: |r, v| r.artist = v,
    },
    Field {
        key: "album",
        get: |r| r.album.as_str(),
        set: |r, v| r.album = v,
    },
    Field {
        key: "seconds",
        get: |r| r.duration_seconds.as_str(),
        set: |r, v| r.duration_seconds = v,
    },
    Field {
        key: "isrc",
        get: |r| r.isrc.as_str(),
        set: |r, v| r.isrc = v,
    },
    Field {
        key: "file_name",
        get: |r| r.file_name.as_str(),
        set: |r, v| r.file_name = v,
    },
];

impl TextRecord for PlaylistRecord {
    const HEADER: &'static str = "NOTE: Do not delete or edit this file.\n\n";

    fn fields() -> &'static [Field<Self>] {
        PLAYLIST_FIELDS
    }
}

impl TextRecord for TrackRecord {
    fn fields() -> &'static [Field<Self>] {
        TRACK_FIELDS
    }
}

/// Strip the record extension from a file name
pub fn file_stem(file_name: &str) -> Result<&str> {
    file_name
        .strip_suffix(TRACK_FILE_EXTENSION)
        .ok_or_else(|| LibraryError::InvalidRecord {
            name: file_name.to_string(),
            message: format!("expected a '{}' file", TRACK_FILE_EXTENSION),
        })
}

/// File name of the record for `stem`
pub fn track_file_name(stem: &str) -> String {
    format!("{}{}", stem, TRACK_FILE_EXTENSION)
}
