use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;

use super::types::{AudioError, DurationSource};

/// Reads durations from file tags and headers with `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyDurations;

impl DurationSource for LoftyDurations {
    fn duration_of(&self, path: &Path) -> Result<Duration, AudioError> {
        let tagged = lofty::read_from_path(path).map_err(|e| AudioError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(tagged.properties().duration())
    }
}
