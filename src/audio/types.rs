//! Collaborator seams for audio output and file metadata.
//!
//! The player only talks to these traits; `RodioOutput` and `LoftyDurations`
//! are the real implementations and tests substitute their own.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::clock::PositionProbe;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("failed to open {path}: {source}", path = .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {reason}", path = .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("failed to read duration of {path}: {reason}", path = .path.display())]
    Metadata { path: PathBuf, reason: String },
    #[error("seek failed: {0}")]
    Seek(String),
}

/// Something that can play one whole file at a time.
pub trait AudioOutput {
    /// Replace whatever is playing with `path` and start it.
    fn load_and_play(&mut self, path: &Path) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), AudioError>;
    /// Volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);
    fn stop(&mut self);
    /// A cursor reader that stays valid across track changes.
    fn probe(&self) -> Arc<dyn PositionProbe>;
}

/// Reads a track's length from its embedded metadata.
pub trait DurationSource {
    fn duration_of(&self, path: &Path) -> Result<Duration, AudioError>;
}
