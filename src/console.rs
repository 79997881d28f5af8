//! Terminal rendering of sync reports
//!
//! Playlists are prefixed with `+` (created), `-` (deleted) or two spaces
//! (changed); their tracks follow, indented, with the same markers.

use core_library::{PlaylistRecord, TrackRecord};
use core_sync::{CollectionDiff, PlaylistSyncState, PullReport, PushReport};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub fn render_pull<W: Write>(out: &mut W, report: &PullReport) -> io::Result<()> {
    for pulled in &report.playlists {
        writeln!(out, "+ {}", pulled.playlist.directory_name)?;
    }
    writeln!(
        out,
        "\npulled {} playlists ({} tracks)",
        report.playlists.len(),
        report.track_count()
    )
}

pub fn render_diff<W: Write>(out: &mut W, diff: &CollectionDiff) -> io::Result<()> {
    for changes in &diff.local_only {
        writeln!(out, "+ {}", changes.playlist.directory_name)?;
        for track in &changes.added {
            writeln!(out, "  + {}", track.file_name)?;
        }
    }

    for changes in &diff.remote_only {
        writeln!(out, "- {}", changes.playlist.name)?;
        for track in &changes.removed {
            writeln!(out, "  - {}", track.title)?;
        }
    }

    for changes in diff
        .both
        .iter()
        .filter(|c| !c.is_empty() || !c.duplicates.is_empty())
    {
        writeln!(out, "  {}", changes.playlist.name)?;
        for track in &changes.added {
            writeln!(out, "  + {}", track.file_name)?;
        }
        for track in &changes.removed {
            writeln!(out, "  - {}", track.title)?;
        }
        render_duplicate_tracks(out, &changes.duplicates)?;
    }
    render_duplicate_playlists(out, &diff.duplicates)?;

    if diff.is_empty() {
        writeln!(out, "\nthere is no difference")?;
    }
    Ok(())
}

pub fn render_push<W: Write>(out: &mut W, report: &PushReport) -> io::Result<()> {
    for outcome in &report.outcomes {
        match outcome.state {
            PlaylistSyncState::Skipped if outcome.duplicates.is_empty() => continue,
            PlaylistSyncState::Deleted => writeln!(out, "- {}", outcome.playlist.name)?,
            PlaylistSyncState::Created | PlaylistSyncState::TracksPushed => {
                writeln!(out, "+ {}", outcome.playlist.directory_name)?
            }
            _ => writeln!(out, "  {}", outcome.playlist.name)?,
        }

        for track in &outcome.added {
            writeln!(out, "  + {}", track.title)?;
        }
        for track in &outcome.removed {
            writeln!(out, "  - {}", track.title)?;
        }
        for failure in &outcome.failures {
            writeln!(out, "  ! {}: {}", failure.track.file_name, failure.error)?;
        }
        render_duplicate_tracks(out, &outcome.duplicates)?;
    }
    render_duplicate_playlists(out, &report.duplicates)?;

    if !report.has_changes() {
        writeln!(out, "\nthere was no change on remote")?;
    }
    Ok(())
}

fn render_duplicate_tracks<W: Write>(out: &mut W, tracks: &[TrackRecord]) -> io::Result<()> {
    for track in tracks {
        writeln!(out, "  ! {}: another track file has the same id", track.file_name)?;
    }
    Ok(())
}

fn render_duplicate_playlists<W: Write>(
    out: &mut W,
    playlists: &[PlaylistRecord],
) -> io::Result<()> {
    for playlist in playlists {
        writeln!(
            out,
            "! {}: another playlist directory has the same id",
            playlist.directory_name
        )?;
    }
    Ok(())
}

pub fn render_cleaned<W: Write>(out: &mut W, cleaned: &[PathBuf]) -> io::Result<()> {
    for path in cleaned {
        writeln!(out, "{} was deleted.", path.display())?;
    }
    Ok(())
}

/// Ask until the answer is yes or no; end of input counts as no
pub fn ask_for_confirmation<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    out: &mut W,
) -> io::Result<bool> {
    loop {
        write!(out, "{} [y/n]: ", prompt)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}
