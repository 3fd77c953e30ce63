use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::clock::{BackendSample, PositionProbe};

use super::sink::open_paused_sink;
use super::types::{AudioError, AudioOutput};

type CurrentSink = Arc<Mutex<Option<Sink>>>;

fn lock(current: &CurrentSink) -> MutexGuard<'_, Option<Sink>> {
    current.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Audio output on the default device via `rodio`.
///
/// The stream has to stay on the thread that opened it; only the current
/// sink is shared, so the poller can read its cursor.
pub struct RodioOutput {
    stream: OutputStream,
    current: CurrentSink,
    volume: f32,
}

impl RodioOutput {
    pub fn open(volume: f32) -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the terminal UI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            current: Arc::new(Mutex::new(None)),
            volume: volume.clamp(0.0, 1.0),
        })
    }
}

impl AudioOutput for RodioOutput {
    fn load_and_play(&mut self, path: &Path) -> Result<(), AudioError> {
        let sink = open_paused_sink(&self.stream, path)?;
        sink.set_volume(self.volume);

        let mut current = lock(&self.current);
        if let Some(old) = current.take() {
            old.stop();
        }
        sink.play();
        *current = Some(sink);
        debug!("audio: playing {}", path.display());
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = lock(&self.current).as_ref() {
            s.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(s) = lock(&self.current).as_ref() {
            s.play();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        match lock(&self.current).as_ref() {
            Some(s) => s.try_seek(position).map_err(|e| AudioError::Seek(e.to_string())),
            None => Ok(()),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(s) = lock(&self.current).as_ref() {
            s.set_volume(self.volume);
        }
    }

    fn stop(&mut self) {
        if let Some(s) = lock(&self.current).take() {
            s.stop();
        }
    }

    fn probe(&self) -> Arc<dyn PositionProbe> {
        Arc::new(SinkProbe {
            current: self.current.clone(),
        })
    }
}

struct SinkProbe {
    current: CurrentSink,
}

impl PositionProbe for SinkProbe {
    fn sample(&self) -> BackendSample {
        match lock(&self.current).as_ref() {
            Some(s) => BackendSample {
                position_seconds: Some(s.get_pos().as_secs_f64()),
                drained: s.empty(),
            },
            None => BackendSample::default(),
        }
    }
}
