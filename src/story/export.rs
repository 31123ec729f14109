//! Story serialization and file export.
//!
//! The export format is the interchange contract with the terminal
//! players: UTF-8 JSON, pretty-printed with two-space indent, shaped
//! `{ "title": ..., "entries": [...] }`. Serialization is a pure
//! function of the story, so exporting twice without intervening edits
//! produces byte-identical files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Story;

/// Filename used when the trimmed story title is empty.
const FALLBACK_FILENAME: &str = "data.json";

/// Errors raised while writing or loading a story file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize story: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid story file: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialize the story as pretty-printed two-space-indented JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn story_json(story: &Story) -> Result<String, ExportError> {
    serde_json::to_string_pretty(story).map_err(ExportError::Serialize)
}

/// Derive the export filename from the story title.
///
/// The title is trimmed, lower-cased, and spaces become underscores,
/// with `.json` appended. An empty or all-whitespace title falls back
/// to `data.json`.
pub fn export_filename(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return String::from(FALLBACK_FILENAME);
    }
    format!("{}.json", trimmed.to_lowercase().replace(' ', "_"))
}

/// Write the story into `dir` under its derived filename.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be
/// written.
pub fn write_export(story: &Story, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_filename(&story.title));
    let json = story_json(story)?;
    fs::write(&path, json).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Load a story from an exported JSON file.
///
/// This is the play path. The editor never parses JSON back into its
/// own state; only `storyloom play` reads files, whether produced by
/// [`write_export`] or edited by hand.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not contain a
/// valid story.
pub fn read_story(path: &Path) -> Result<Story, ExportError> {
    let json = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ExportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
