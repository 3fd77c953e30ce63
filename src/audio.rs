//! Audio subsystem: output and metadata collaborators.
//!
//! This module exposes the traits the player talks to and their `rodio`
//! (output) and `lofty` (duration) implementations.

mod metadata;
mod output;
mod sink;
mod types;

pub use metadata::LoftyDurations;
pub use output::RodioOutput;
pub use types::{AudioError, AudioOutput, DurationSource};
