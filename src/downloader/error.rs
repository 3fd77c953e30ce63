use std::path::PathBuf;

use thiserror::Error;

use crate::library::LibraryError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid video id {0:?}")]
    InvalidId(String),
    #[error("track title must not be empty")]
    EmptyTitle,
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("downloaded audio not found at {path}", path = .path.display())]
    MissingOutput { path: PathBuf },
    #[error("I/O error on {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Library(#[from] LibraryError),
}
