use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

use super::error::LibraryError;
use super::record::LibraryRecord;
use super::store::LibraryStore;

/// Locates a track's audio file from its id: `{dir}/{id}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFiles {
    dir: PathBuf,
    extension: String,
}

impl TrackFiles {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim().trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{}", self.extension))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Delete the audio file for `id`, reporting what happened.
    pub fn remove(&self, id: &str) -> FileRemoval {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => FileRemoval::Removed,
            Err(e) if e.kind() == io::ErrorKind::NotFound => FileRemoval::Absent,
            Err(e) => FileRemoval::Failed(e),
        }
    }
}

/// Outcome of deleting a track's audio file.
#[derive(Debug)]
pub enum FileRemoval {
    Removed,
    Absent,
    Failed(io::Error),
}

impl fmt::Display for FileRemoval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRemoval::Removed => f.write_str("audio file removed"),
            FileRemoval::Absent => f.write_str("no audio file found"),
            FileRemoval::Failed(e) => write!(f, "audio file could not be removed: {e}"),
        }
    }
}

/// Result of removing a track: the metadata is gone, the file may not be.
#[derive(Debug)]
pub struct RemovalReport {
    pub id: String,
    pub record: LibraryRecord,
    pub file: FileRemoval,
}

impl RemovalReport {
    /// True when the record was removed but its audio file is still on disk.
    pub fn diverged(&self) -> bool {
        matches!(self.file, FileRemoval::Failed(_))
    }
}

/// Remove `id` from the library, then try to delete its audio file.
///
/// A file that cannot be deleted does not undo the metadata removal; it shows
/// up in [`RemovalReport::file`].
pub fn remove_track(
    store: &mut LibraryStore,
    files: &TrackFiles,
    id: &str,
) -> Result<RemovalReport, LibraryError> {
    let record = store.remove(id)?;
    let file = files.remove(id);
    if let FileRemoval::Failed(e) = &file {
        warn!(
            "track {id} removed from library but {} remains: {e}",
            files.path_for(id).display()
        );
    }
    Ok(RemovalReport {
        id: id.to_string(),
        record,
        file,
    })
}
