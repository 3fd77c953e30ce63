//! Track library: records, the persisted table and the audio files on disk.
//!
//! `LibraryStore` keeps every record in memory and rewrites the table on each
//! mutation. Audio files live next to it in a tracks folder, one per id, and
//! are managed through `TrackFiles`.

mod error;
mod files;
mod record;
mod store;
mod table;

pub use error::{LibraryError, MalformedRow, MalformedRows};
pub use files::{FileRemoval, RemovalReport, TrackFiles, remove_track};
pub use record::{LibraryRecord, MAX_RATING, parse_rating, stars};
pub use store::LibraryStore;
pub use table::Entries;

#[cfg(test)]
mod tests;
