use super::error::LibraryError;

/// Highest rating a track can carry. Zero means "unrated".
pub const MAX_RATING: u8 = 5;

/// Metadata kept for one track in the library.
///
/// The track id is the key in [`LibraryStore`](super::LibraryStore) and is not
/// stored on the record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRecord {
    pub name: String,
    pub artist: String,
    pub rating: u8,
    pub play_count: u32,
}

impl LibraryRecord {
    /// Create a record that has never been played.
    pub fn new(name: impl Into<String>, artist: impl Into<String>, rating: u8) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            rating,
            play_count: 0,
        }
    }

    /// One-line summary: `"{name} - {artist} {stars}"`.
    pub fn info(&self) -> String {
        format!("{} - {} {}", self.name, self.artist, self.stars())
    }

    pub fn stars(&self) -> String {
        stars(self.rating)
    }
}

/// Render a rating as that many `*` characters.
pub fn stars(rating: u8) -> String {
    "*".repeat(rating as usize)
}

/// Check that `rating` lies in `0..=MAX_RATING`.
pub fn check_rating(rating: i64) -> Result<u8, LibraryError> {
    match u8::try_from(rating) {
        Ok(r) if r <= MAX_RATING => Ok(r),
        _ => Err(LibraryError::Validation(format!(
            "rating {rating} is outside 0..={MAX_RATING}"
        ))),
    }
}

/// Parse user-entered rating text.
pub fn parse_rating(text: &str) -> Result<u8, LibraryError> {
    let text = text.trim();
    let value: i64 = text.parse().map_err(|_| {
        LibraryError::Validation(format!("rating {text:?} is not a whole number"))
    })?;
    check_rating(value)
}
