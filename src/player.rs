//! Playback control: ties the playlist, the clock and the audio output.

mod control;

pub use control::{NowPlaying, Player, PlayerError};
