use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use super::poller::{BackendSample, ClockEvent};
use super::state::{ClockState, PlaybackClock, Progress, SeekPolicy, Tick};

/// Point-in-time copy of the clock for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockSnapshot {
    pub track_id: Option<String>,
    pub state: ClockState,
    pub progress: Progress,
    pub generation: u64,
}

/// A [`PlaybackClock`] shared between the poller thread and the foreground.
///
/// Every call takes the one lock, so provenance, anchor and position are
/// always read and written together.
#[derive(Debug, Clone, Default)]
pub struct SharedClock {
    inner: Arc<Mutex<PlaybackClock>>,
}

impl SharedClock {
    pub fn new(policy: SeekPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PlaybackClock::new(policy))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackClock> {
        // A panicking holder cannot leave the clock half-updated: every
        // method finishes its writes before returning.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load(&self, track_id: &str, length_seconds: f64) {
        self.lock().load(track_id, length_seconds);
    }

    pub fn stop(&self) {
        self.lock().stop();
    }

    pub fn toggle_play_pause(&self) -> ClockState {
        self.lock().toggle_play_pause(Instant::now())
    }

    pub fn seek(&self, fraction: f64) -> Option<f64> {
        self.lock().seek(fraction, Instant::now())
    }

    pub fn seek_target(&self, fraction: f64) -> Option<f64> {
        self.lock().seek_target(fraction)
    }

    pub fn tick(&self, now: Instant, backend_seconds: Option<f64>) -> Tick {
        self.lock().tick(now, backend_seconds)
    }

    /// Tick with a backend sample taken while `generation` was current.
    ///
    /// Returns `None` without touching the clock if a track was loaded or
    /// stopped since, because the sample then belongs to the old track. On
    /// the tick that ends the track the matching [`ClockEvent::Ended`] is
    /// built under the same lock.
    pub fn tick_for(
        &self,
        generation: u64,
        now: Instant,
        sample: BackendSample,
    ) -> Option<(Tick, Option<ClockEvent>)> {
        let mut clock = self.lock();
        if clock.generation() != generation {
            return None;
        }
        let tick = clock.tick_with(now, sample.position_seconds, sample.drained);
        let ended = tick.ended.then(|| ClockEvent::Ended {
            track_id: clock.track_id().unwrap_or_default().to_string(),
            generation,
        });
        Some((tick, ended))
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation()
    }

    pub fn state(&self) -> ClockState {
        self.lock().state()
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        let clock = self.lock();
        ClockSnapshot {
            track_id: clock.track_id().map(str::to_string),
            state: clock.state(),
            progress: clock.progress(),
            generation: clock.generation(),
        }
    }
}
