use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

use super::handle::SharedClock;

/// One reading of the audio backend's cursor.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BackendSample {
    pub position_seconds: Option<f64>,
    /// The backend has played everything it was given.
    pub drained: bool,
}

/// Read access to the audio backend's cursor, usable from the poller thread.
pub trait PositionProbe: Send + Sync {
    fn sample(&self) -> BackendSample;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockEvent {
    /// The track loaded at `generation` reached its end.
    Ended { track_id: String, generation: u64 },
}

/// Background thread ticking a [`SharedClock`]. Stops and joins on drop.
pub struct Poller {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Tick `clock` every `interval`, sending [`ClockEvent::Ended`] when a track
/// finishes. The thread also exits once `events` has no receiver.
pub fn spawn_poller(
    clock: SharedClock,
    probe: Arc<dyn PositionProbe>,
    interval: Duration,
    events: Sender<ClockEvent>,
) -> Poller {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let join = thread::spawn(move || {
        debug!("poller: started, interval {interval:?}");
        while !stop_flag.load(Ordering::Relaxed) {
            let generation = clock.generation();
            let sample = probe.sample();
            if let Some((_, Some(event))) = clock.tick_for(generation, Instant::now(), sample) {
                if events.send(event).is_err() {
                    break;
                }
            }
            thread::sleep(interval);
        }
        debug!("poller: stopped");
    });

    Poller {
        stop,
        join: Some(join),
    }
}
