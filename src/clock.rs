//! Playback clock: the authoritative position of the loaded track.
//!
//! The clock reconciles the audio backend's cursor with wall-clock time since
//! the last user seek, detects the end of a track and hands that back to the
//! caller as an event. `SharedClock` wraps it for use from the background
//! poller and the foreground at once.

mod handle;
mod poller;
mod state;

pub use handle::{ClockSnapshot, SharedClock};
pub use poller::{BackendSample, ClockEvent, Poller, PositionProbe, spawn_poller};
pub use state::{ClockState, PlaybackClock, Progress, Provenance, SeekPolicy, Tick, format_clock};
