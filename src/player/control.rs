use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use thiserror::Error;

use crate::audio::{AudioError, AudioOutput, DurationSource};
use crate::clock::{ClockState, PositionProbe, Progress, SharedClock};
use crate::library::{LibraryStore, TrackFiles};
use crate::playlist::{PlaylistError, PlaylistSession};

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
    #[error("track {0} is no longer in the library")]
    StaleTrack(String),
    #[error("no audio file for track {id} at {path}", path = .path.display())]
    MissingAudio { id: String, path: PathBuf },
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// What the player is on right now, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub track_id: String,
    pub info: String,
    pub state: ClockState,
    pub progress: Progress,
}

/// Drives a playlist through an audio output and keeps the clock in step.
///
/// The library is passed into each call rather than owned, so the caller
/// can keep using it between calls.
pub struct Player<O: AudioOutput> {
    session: PlaylistSession,
    clock: SharedClock,
    output: O,
    durations: Box<dyn DurationSource>,
    files: TrackFiles,
    volume: f32,
}

impl<O: AudioOutput> Player<O> {
    pub fn new(
        session: PlaylistSession,
        clock: SharedClock,
        output: O,
        durations: Box<dyn DurationSource>,
        files: TrackFiles,
    ) -> Self {
        Self {
            session,
            clock,
            output,
            durations,
            files,
            volume: 1.0,
        }
    }

    pub fn session(&self) -> &PlaylistSession {
        &self.session
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn probe(&self) -> Arc<dyn PositionProbe> {
        self.output.probe()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Play the current entry, or the first playable one after it.
    pub fn start(&mut self, store: &mut LibraryStore) -> Result<(), PlayerError> {
        match self.play_current(store) {
            Ok(()) => Ok(()),
            Err(e) if self.session.len() > 1 => {
                warn!("skipping track: {e}");
                self.skip_forward(store, self.session.len() - 1)
            }
            Err(e) => Err(e),
        }
    }

    /// Load and start the current playlist entry.
    ///
    /// On failure the output and clock are stopped.
    pub fn play_current(&mut self, store: &mut LibraryStore) -> Result<(), PlayerError> {
        let result = self.try_play_current(store);
        if result.is_err() {
            self.stop();
        }
        result
    }

    fn try_play_current(&mut self, store: &mut LibraryStore) -> Result<(), PlayerError> {
        let id = self
            .session
            .current()
            .ok_or(PlaylistError::Empty)?
            .to_string();
        let info = store
            .get(&id)
            .map(|rec| rec.info())
            .ok_or_else(|| PlayerError::StaleTrack(id.clone()))?;

        let path = self.files.path_for(&id);
        if !path.is_file() {
            return Err(PlayerError::MissingAudio { id, path });
        }

        let length = self.durations.duration_of(&path)?;
        self.output.load_and_play(&path)?;
        self.clock.load(&id, length.as_secs_f64());
        info!("playing {id}: {info}");

        if let Err(e) = store.increment_play_count(&id) {
            warn!("could not record play of track {id}: {e}");
        }
        Ok(())
    }

    pub fn next(&mut self, store: &mut LibraryStore) -> Result<(), PlayerError> {
        self.session.next()?;
        self.play_current(store)
    }

    /// Go back one entry. Returns `false`, and leaves playback alone, when
    /// already at the first entry.
    pub fn previous(&mut self, store: &mut LibraryStore) -> Result<bool, PlayerError> {
        if !self.session.previous()? {
            return Ok(false);
        }
        self.play_current(store)?;
        Ok(true)
    }

    /// Move on after the current track ended, skipping entries that fail to
    /// play. Each entry is tried at most once.
    pub fn advance(&mut self, store: &mut LibraryStore) -> Result<(), PlayerError> {
        let attempts = self.session.len();
        if attempts == 0 {
            self.stop();
            return Err(PlaylistError::Empty.into());
        }
        self.skip_forward(store, attempts)
    }

    fn skip_forward(&mut self, store: &mut LibraryStore, attempts: usize) -> Result<(), PlayerError> {
        let mut last = PlayerError::Playlist(PlaylistError::Empty);
        for _ in 0..attempts {
            self.session.next()?;
            match self.play_current(store) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("skipping track: {e}");
                    last = e;
                }
            }
        }
        Err(last)
    }

    /// Pause or resume. From stopped or ended this restarts the current entry.
    pub fn toggle_play_pause(&mut self, store: &mut LibraryStore) -> Result<ClockState, PlayerError> {
        match self.clock.state() {
            ClockState::Stopped | ClockState::Ended => {
                self.play_current(store)?;
            }
            ClockState::Playing | ClockState::Paused => match self.clock.toggle_play_pause() {
                ClockState::Paused => self.output.pause(),
                ClockState::Playing => self.output.resume(),
                _ => {}
            },
        }
        Ok(self.clock.state())
    }

    /// Jump to `fraction` of the current track. Returns the target position
    /// in seconds, or `None` if there is nothing to seek in.
    pub fn seek(&mut self, fraction: f64) -> Result<Option<f64>, PlayerError> {
        let Some(target) = self.clock.seek_target(fraction) else {
            return Ok(None);
        };
        // The clock only follows once the audio has actually moved.
        self.output.seek(Duration::from_secs_f64(target))?;
        Ok(self.clock.seek(fraction))
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, seconds: f64) -> Result<Option<f64>, PlayerError> {
        let progress = self.clock.snapshot().progress;
        if progress.length_seconds <= 0.0 {
            return Ok(None);
        }
        self.seek((progress.position_seconds + seconds) / progress.length_seconds)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.output.set_volume(self.volume);
    }

    pub fn stop(&mut self) {
        self.output.stop();
        self.clock.stop();
    }

    pub fn now_playing(&self, store: &LibraryStore) -> Option<NowPlaying> {
        let snapshot = self.clock.snapshot();
        let track_id = snapshot.track_id?;
        let info = store
            .get(&track_id)
            .map(|rec| rec.info())
            .unwrap_or_else(|| track_id.clone());
        Some(NowPlaying {
            track_id,
            info,
            state: snapshot.state,
            progress: snapshot.progress,
        })
    }
}
