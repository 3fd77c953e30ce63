use std::path::{Path, PathBuf};

use log::{debug, info};

use super::error::LibraryError;
use super::record::{LibraryRecord, check_rating};
use super::table::{self, Entries};

/// In-memory track library backed by a flat table on disk.
///
/// Every mutation rewrites the whole table before returning, so `get` always
/// reflects the last successful call. A mutation whose write fails is undone
/// in memory too. Stores created with
/// [`LibraryStore::in_memory`] never touch the filesystem.
#[derive(Debug, Clone, Default)]
pub struct LibraryStore {
    entries: Entries,
    path: Option<PathBuf>,
    write_header: bool,
}

impl LibraryStore {
    /// Load the table at `path`, or start empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>, write_header: bool) -> Result<Self, LibraryError> {
        let path = path.into();
        let entries = if path.exists() {
            Self::load(&path)?
        } else {
            info!("no library at {}, starting empty", path.display());
            Entries::new()
        };
        debug!("loaded {} track(s) from {}", entries.len(), path.display());
        Ok(Self {
            entries,
            path: Some(path),
            write_header,
        })
    }

    /// A store with no backing file.
    pub fn in_memory(entries: Entries) -> Self {
        Self {
            entries,
            path: None,
            write_header: false,
        }
    }

    /// Parse the whole table at `path`. Fails if any row is malformed.
    pub fn load(path: &Path) -> Result<Entries, LibraryError> {
        table::read_table(path)
    }

    /// Replace the table at `path` with `entries`.
    pub fn save(path: &Path, entries: &[(String, LibraryRecord)], header: bool) -> Result<(), LibraryError> {
        table::write_table(path, entries, header)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn entries(&self) -> &[(String, LibraryRecord)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LibraryRecord> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, rec)| rec)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut LibraryRecord> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == id)
            .map(|(_, rec)| rec)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn set_rating(&mut self, id: &str, rating: i64) -> Result<(), LibraryError> {
        let rating = check_rating(rating)?;
        let record = self
            .get_mut(id)
            .ok_or_else(|| LibraryError::Validation(format!("track {id} not found")))?;
        let previous = std::mem::replace(&mut record.rating, rating);
        if let Err(e) = self.persist() {
            if let Some(record) = self.get_mut(id) {
                record.rating = previous;
            }
            return Err(e);
        }
        info!("track {id} rated {rating}");
        Ok(())
    }

    /// Bump the play count. Unknown ids are ignored.
    pub fn increment_play_count(&mut self, id: &str) -> Result<(), LibraryError> {
        let Some(record) = self.get_mut(id) else {
            debug!("play count: ignoring unknown track {id}");
            return Ok(());
        };
        let previous = record.play_count;
        record.play_count = previous.saturating_add(1);
        if let Err(e) = self.persist() {
            if let Some(record) = self.get_mut(id) {
                record.play_count = previous;
            }
            return Err(e);
        }
        debug!("track {id} play count now {}", previous.saturating_add(1));
        Ok(())
    }

    /// Remove a record. The track's audio file is left alone; see
    /// [`remove_track`](super::remove_track) for the combined operation.
    pub fn remove(&mut self, id: &str) -> Result<LibraryRecord, LibraryError> {
        let pos = self
            .entries
            .iter()
            .position(|(key, _)| key == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        let entry = self.entries.remove(pos);
        if let Err(e) = self.persist() {
            self.entries.insert(pos, entry);
            return Err(e);
        }
        info!("removed track {id} from library");
        Ok(entry.1)
    }

    /// Add a new record under a fresh id.
    ///
    /// If the table cannot be written the record is taken out again.
    pub fn insert(&mut self, id: &str, record: LibraryRecord) -> Result<(), LibraryError> {
        if id.trim().is_empty() {
            return Err(LibraryError::Validation("track id must not be empty".into()));
        }
        if record.name.trim().is_empty() || record.artist.trim().is_empty() {
            return Err(LibraryError::Validation(format!(
                "track {id} needs a non-empty name and artist"
            )));
        }
        if self.contains(id) {
            return Err(LibraryError::Validation(format!("track {id} already exists")));
        }
        check_rating(record.rating.into())?;

        self.entries.push((id.to_string(), record));
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }
        info!("added track {id} to library");
        Ok(())
    }

    /// Next free numeric id: the largest numeric id plus one, two digits wide.
    /// Non-numeric ids are ignored. Fails once the largest id is `u64::MAX`.
    pub fn next_track_id(&self) -> Result<String, LibraryError> {
        let max = self
            .entries
            .iter()
            .filter(|(id, _)| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|(id, _)| id.parse::<u64>().ok())
            .max();
        match max {
            Some(n) => n
                .checked_add(1)
                .map(|next| format!("{next:02}"))
                .ok_or_else(|| LibraryError::Validation(format!("no numeric track id after {n}"))),
            None => Ok("01".to_string()),
        }
    }

    /// One line per record, `"{id} {info}"`, in store order.
    pub fn list_all(&self) -> String {
        let mut out = String::new();
        for (id, rec) in &self.entries {
            out.push_str(id);
            out.push(' ');
            out.push_str(&rec.info());
            out.push('\n');
        }
        out
    }

    /// Multi-line detail view of one record.
    pub fn details(&self, id: &str) -> Option<String> {
        self.get(id).map(|rec| {
            format!(
                "Track: {}\nArtist: {}\nRating: {}\nPlay Count: {}",
                rec.name, rec.artist, rec.rating, rec.play_count
            )
        })
    }

    fn persist(&self) -> Result<(), LibraryError> {
        match &self.path {
            Some(path) => Self::save(path, &self.entries, self.write_header),
            None => Ok(()),
        }
    }
}
