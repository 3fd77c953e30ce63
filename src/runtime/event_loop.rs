use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioOutput;
use crate::clock::{ClockEvent, format_clock};
use crate::config;
use crate::library::LibraryStore;
use crate::player::{Player, PlayerError};
use crate::ui;

const VOLUME_STEP: f32 = 0.05;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Last message for the status box.
    pub status: String,
    /// Whether the details popup is open.
    pub show_details: bool,
}

/// Main terminal event loop: reacts to finished tracks, draws, and handles
/// input. Returns `Ok(())` when the user quits.
pub fn run<O: AudioOutput>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    player: &mut Player<O>,
    store: &mut LibraryStore,
    events: &mpsc::Receiver<ClockEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ClockEvent::Ended {
            track_id,
            generation,
        }) = events.try_recv()
        {
            if generation != player.clock().generation() {
                debug!("ignoring end of {track_id} from generation {generation}");
                continue;
            }
            debug!("track {track_id} ended");
            if let Err(e) = player.advance(store) {
                state.status = format!("Playback stopped: {e}");
            }
        }

        let now_playing = player.now_playing(store);
        let playlist = player.session().lines(store);
        let details = if state.show_details {
            player
                .session()
                .current()
                .and_then(|id| store.details(id))
        } else {
            None
        };
        let view = ui::PlayerView {
            now_playing: now_playing.as_ref(),
            volume: player.volume(),
            playlist: &playlist,
            current: player.session().current_index(),
            status: &state.status,
            seek_step_seconds: settings.playback.seek_step_seconds,
            details: details.as_deref(),
        };
        terminal.draw(|f| ui::draw(f, &view))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, player, store, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
fn handle_key_event<O: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    player: &mut Player<O>,
    store: &mut LibraryStore,
    state: &mut EventLoopState,
) -> bool {
    let step = settings.playback.seek_step_seconds as f64;
    let outcome: Result<Option<String>, PlayerError> = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('p') | KeyCode::Char(' ') => player
            .toggle_play_pause(store)
            .map(|s| Some(ui::state_label(s).to_string())),
        KeyCode::Char('l') | KeyCode::Char('n') => player.next(store).map(|()| None),
        KeyCode::Char('h') => player
            .previous(store)
            .map(|moved| (!moved).then(|| "Already at the first track".to_string())),
        KeyCode::Char('L') => player.seek_by(step).map(seek_status),
        KeyCode::Char('H') => player.seek_by(-step).map(seek_status),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = f64::from(c.to_digit(10).unwrap_or(0)) / 10.0;
            player.seek(tenth).map(seek_status)
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            player.set_volume(player.volume() + VOLUME_STEP);
            Ok(Some(volume_status(player.volume())))
        }
        KeyCode::Char('-') => {
            player.set_volume(player.volume() - VOLUME_STEP);
            Ok(Some(volume_status(player.volume())))
        }
        KeyCode::Char('K') => {
            state.show_details = !state.show_details;
            Ok(None)
        }
        _ => Ok(None),
    };

    match outcome {
        Ok(Some(msg)) => state.status = msg,
        Ok(None) => {}
        Err(e) => state.status = e.to_string(),
    }
    false
}

fn seek_status(target: Option<f64>) -> Option<String> {
    target.map(|t| format!("Seeked to {}", format_clock(t)))
}

fn volume_status(volume: f32) -> String {
    format!("Volume {}%", (volume * 100.0).round() as u32)
}
