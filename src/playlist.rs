//! Playlist session: the ordered list of track ids queued for playback.

mod session;

pub use session::{AddOutcome, PlaylistError, PlaylistSession};
