use log::warn;
use thiserror::Error;

use crate::library::LibraryStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("invalid track number {0}")]
    InvalidTrack(String),
    #[error("playlist is empty")]
    Empty,
}

/// Result of a successful [`PlaylistSession::add`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The id was already queued; nothing changed.
    Duplicate,
}

/// Ordered track ids plus the index of the current entry.
///
/// Ids are checked against the library when added and not again afterwards.
#[derive(Debug, Clone, Default)]
pub struct PlaylistSession {
    ids: Vec<String>,
    index: usize,
}

impl PlaylistSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: &str, library: &LibraryStore) -> Result<AddOutcome, PlaylistError> {
        if library.get(id).is_none() {
            return Err(PlaylistError::InvalidTrack(id.to_string()));
        }
        if self.ids.iter().any(|queued| queued == id) {
            warn!("track {id} is already in the playlist");
            return Ok(AddOutcome::Duplicate);
        }
        self.ids.push(id.to_string());
        Ok(AddOutcome::Added)
    }

    /// Move to the next entry, wrapping from the last one to the first.
    pub fn next(&mut self) -> Result<&str, PlaylistError> {
        if self.ids.is_empty() {
            return Err(PlaylistError::Empty);
        }
        self.index = if self.index + 1 >= self.ids.len() {
            0
        } else {
            self.index + 1
        };
        Ok(&self.ids[self.index])
    }

    /// Move to the previous entry. At the first entry this does nothing and
    /// returns `false`; unlike [`next`](Self::next) it never wraps.
    pub fn previous(&mut self) -> Result<bool, PlaylistError> {
        if self.ids.is_empty() {
            return Err(PlaylistError::Empty);
        }
        if self.index == 0 {
            return Ok(false);
        }
        self.index -= 1;
        Ok(true)
    }

    pub fn reset(&mut self) {
        self.ids.clear();
        self.index = 0;
    }

    pub fn current(&self) -> Option<&str> {
        self.ids.get(self.index).map(String::as_str)
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.ids.is_empty()).then_some(self.index)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `"{id}: {name}"` per entry, skipping ids no longer in the library.
    pub fn lines(&self, library: &LibraryStore) -> Vec<String> {
        self.ids
            .iter()
            .filter_map(|id| library.get(id).map(|rec| format!("{id}: {}", rec.name)))
            .collect()
    }
}
