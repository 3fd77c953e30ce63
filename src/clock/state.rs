use std::time::Instant;

use log::debug;

/// A skip-derived clock goes back to the backend cursor once the two agree
/// within this many seconds (only with [`SeekPolicy::ResyncToBackend`]).
const RESYNC_TOLERANCE_SECONDS: f64 = 1.0;

/// Play state of the loaded track. There is no separate loaded state:
/// `load` starts playback straight away.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Stopped,
    Playing,
    Paused,
    Ended,
}

/// Which source the clock trusts for the current position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Provenance {
    /// The audio backend's own cursor.
    BackendReported,
    /// Wall-clock time elapsed since the last user seek.
    SkipDerived {
        anchor_seconds: f64,
        anchored_at: Instant,
    },
}

/// What happens to a skip-derived clock after the backend catches up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SeekPolicy {
    /// Stay skip-derived until the next track is loaded.
    #[default]
    HoldSkipAnchor,
    /// Switch back to the backend cursor once it agrees with the estimate.
    ResyncToBackend,
}

/// Plain display data for the current position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Progress {
    pub position_seconds: f64,
    pub length_seconds: f64,
    /// `position / length`, within `[0, 1]`.
    pub fraction: f64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Progress {
    fn at(position_seconds: f64, length_seconds: f64) -> Self {
        let fraction = if length_seconds > 0.0 {
            (position_seconds / length_seconds).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let whole = position_seconds.max(0.0).floor() as u64;
        Self {
            position_seconds,
            length_seconds,
            fraction,
            minutes: whole / 60,
            seconds: whole % 60,
        }
    }

    /// Elapsed time as `m:ss`.
    pub fn elapsed_label(&self) -> String {
        format!("{}:{:02}", self.minutes, self.seconds)
    }

    /// Track length as `m:ss`.
    pub fn total_label(&self) -> String {
        format_clock(self.length_seconds)
    }
}

/// Format seconds as `m:ss`, flooring partial seconds.
pub fn format_clock(seconds: f64) -> String {
    let whole = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Output of one [`PlaybackClock::tick`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tick {
    pub progress: Progress,
    /// Set on the single tick that observed the end of the track.
    pub ended: bool,
}

/// Position tracker for the currently loaded track.
///
/// Time is always passed in, so the reconciliation logic can be driven from
/// tests without sleeping.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    track_id: Option<String>,
    length_seconds: f64,
    state: ClockState,
    provenance: Provenance,
    position_seconds: f64,
    paused_at: Option<Instant>,
    generation: u64,
    policy: SeekPolicy,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(SeekPolicy::default())
    }
}

impl PlaybackClock {
    pub fn new(policy: SeekPolicy) -> Self {
        Self {
            track_id: None,
            length_seconds: 0.0,
            state: ClockState::Stopped,
            provenance: Provenance::BackendReported,
            position_seconds: 0.0,
            paused_at: None,
            generation: 0,
            policy,
        }
    }

    /// Reset for a new track and start playing it.
    pub fn load(&mut self, track_id: impl Into<String>, length_seconds: f64) {
        let track_id = track_id.into();
        self.length_seconds = if length_seconds.is_finite() && length_seconds > 0.0 {
            length_seconds
        } else {
            0.0
        };
        self.position_seconds = 0.0;
        self.paused_at = None;
        self.provenance = Provenance::BackendReported;
        self.state = ClockState::Playing;
        self.generation += 1;
        debug!(
            "clock: loaded track {track_id} ({:.1}s), generation {}",
            self.length_seconds, self.generation
        );
        self.track_id = Some(track_id);
    }

    /// Forget the current track.
    pub fn stop(&mut self) {
        self.track_id = None;
        self.length_seconds = 0.0;
        self.position_seconds = 0.0;
        self.paused_at = None;
        self.provenance = Provenance::BackendReported;
        self.state = ClockState::Stopped;
        self.generation += 1;
    }

    /// Flip between playing and paused. Other states are left alone.
    ///
    /// Resuming a skip-derived clock moves its anchor time forward by the
    /// length of the pause, so paused time is not counted as played.
    pub fn toggle_play_pause(&mut self, now: Instant) -> ClockState {
        match self.state {
            ClockState::Playing => {
                self.paused_at = Some(now);
                self.state = ClockState::Paused;
            }
            ClockState::Paused => {
                let paused_for = self
                    .paused_at
                    .take()
                    .map(|at| now.saturating_duration_since(at))
                    .unwrap_or_default();
                if let Provenance::SkipDerived {
                    anchor_seconds,
                    anchored_at,
                } = self.provenance
                {
                    self.provenance = Provenance::SkipDerived {
                        anchor_seconds,
                        anchored_at: anchored_at + paused_for,
                    };
                }
                self.state = ClockState::Playing;
            }
            ClockState::Stopped | ClockState::Ended => {}
        }
        self.state
    }

    /// Jump to `fraction` of the track and trust wall-clock time from here.
    ///
    /// Out-of-range fractions are clamped. Returns the target position, or
    /// `None` when no track with a known length is loaded.
    pub fn seek(&mut self, fraction: f64, now: Instant) -> Option<f64> {
        let target = self.seek_target(fraction)?;
        self.provenance = Provenance::SkipDerived {
            anchor_seconds: target,
            anchored_at: now,
        };
        self.position_seconds = target;
        if self.state == ClockState::Paused {
            self.paused_at = Some(now);
        }
        debug!("clock: seek to {target:.1}s");
        Some(target)
    }

    /// Where [`seek`](Self::seek) would land, without moving the clock.
    pub fn seek_target(&self, fraction: f64) -> Option<f64> {
        if self.track_id.is_none() || self.length_seconds <= 0.0 {
            return None;
        }
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Some(fraction * self.length_seconds)
    }

    /// Recompute the position from the active provenance.
    ///
    /// `backend_seconds` is the audio backend's cursor, if it could be read.
    pub fn tick(&mut self, now: Instant, backend_seconds: Option<f64>) -> Tick {
        self.tick_with(now, backend_seconds, false)
    }

    /// Like [`tick`](Self::tick), but `drained` tells the clock the backend
    /// has run out of audio, which ends the track whatever the position says.
    pub(super) fn tick_with(&mut self, now: Instant, backend_seconds: Option<f64>, drained: bool) -> Tick {
        let mut ended = false;

        if self.state == ClockState::Playing {
            if self.length_seconds <= 0.0 || drained {
                // Nothing left to measure against: treat the track as done.
                self.position_seconds = self.length_seconds;
                ended = true;
            } else {
                let raw = self.raw_position(now, backend_seconds);
                self.position_seconds = raw.clamp(0.0, self.length_seconds);
                ended = raw >= self.length_seconds;
            }
            if ended {
                self.state = ClockState::Ended;
                debug!("clock: track {:?} ended", self.track_id);
            }
        }

        Tick {
            progress: self.progress(),
            ended,
        }
    }

    fn raw_position(&mut self, now: Instant, backend_seconds: Option<f64>) -> f64 {
        let backend = backend_seconds.filter(|s| s.is_finite()).map(|s| s.max(0.0));
        match self.provenance {
            Provenance::BackendReported => backend.unwrap_or(self.position_seconds),
            Provenance::SkipDerived {
                anchor_seconds,
                anchored_at,
            } => {
                let derived = anchor_seconds + now.saturating_duration_since(anchored_at).as_secs_f64();
                match backend {
                    Some(b)
                        if self.policy == SeekPolicy::ResyncToBackend
                            && (b - derived).abs() <= RESYNC_TOLERANCE_SECONDS =>
                    {
                        debug!("clock: backend caught up at {b:.1}s, resynchronising");
                        self.provenance = Provenance::BackendReported;
                        b
                    }
                    _ => derived,
                }
            }
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::at(self.position_seconds, self.length_seconds)
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    /// Bumped on every `load` and `stop`.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
