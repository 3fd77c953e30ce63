use std::error::Error;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{LevelFilter, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::{LoftyDurations, RodioOutput};
use crate::cli::{Cli, Command};
use crate::clock::{ClockEvent, SeekPolicy, SharedClock, spawn_poller};
use crate::config;
use crate::library::{LibraryStore, TrackFiles};
use crate::player::Player;
use crate::playlist::{AddOutcome, PlaylistSession};

mod commands;
mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let log_from_env = startup::init_logging();

    let mut settings = settings::load_settings();
    startup::apply_log_level(&settings, log_from_env);
    settings::apply_cli_overrides(&mut settings, &cli);

    let mut store = LibraryStore::open(&settings.library.path, settings.library.write_header)?;
    let files = TrackFiles::new(&settings.library.tracks_dir, &settings.library.audio_extension);

    match cli.command {
        Command::List => commands::list(&store),
        Command::View { id } => commands::view(&store, &id)?,
        Command::Rate { id, rating } => commands::rate(&mut store, &id, &rating)?,
        Command::Remove { id } => commands::remove(&mut store, &files, &id)?,
        Command::Download {
            video_id,
            title,
            artist,
        } => commands::download(
            &mut store,
            &files,
            &settings.download,
            &video_id,
            &title,
            artist.as_deref(),
        )?,
        Command::Play { ids } => play(&settings, &mut store, files, &ids)?,
    }
    Ok(())
}

/// Queue `ids` (or the whole library) with the playlist's add rules.
fn build_session(store: &LibraryStore, ids: &[String]) -> PlaylistSession {
    let ids: Vec<&str> = if ids.is_empty() {
        store.entries().iter().map(|(id, _)| id.as_str()).collect()
    } else {
        ids.iter().map(String::as_str).collect()
    };

    let mut session = PlaylistSession::new();
    for id in ids {
        match session.add(id, store) {
            Ok(AddOutcome::Added) => {}
            Ok(AddOutcome::Duplicate) => println!("Track {id} is already queued."),
            Err(e) => println!("Skipping: {e}"),
        }
    }
    session
}

fn play(
    settings: &config::Settings,
    store: &mut LibraryStore,
    files: TrackFiles,
    ids: &[String],
) -> Result<(), Box<dyn Error>> {
    let session = build_session(store, ids);
    if session.is_empty() {
        return Err("nothing to play".into());
    }

    let policy = if settings.playback.resync_after_seek {
        SeekPolicy::ResyncToBackend
    } else {
        SeekPolicy::HoldSkipAnchor
    };
    let output = RodioOutput::open(settings.playback.initial_volume)?;
    let mut player = Player::new(
        session,
        SharedClock::new(policy),
        output,
        Box::new(LoftyDurations),
        files,
    );
    player.set_volume(settings.playback.initial_volume);

    let (events_tx, events_rx) = mpsc::channel::<ClockEvent>();
    let mut poller = spawn_poller(
        player.clock().clone(),
        player.probe(),
        Duration::from_millis(settings.playback.tick_interval_ms),
        events_tx,
    );

    let mut state = event_loop::EventLoopState::default();
    if let Err(e) = player.start(store) {
        warn!("nothing in the playlist could be played: {e}");
        state.status = e.to_string();
    }

    // stderr output would tear through the alternate screen.
    let log_level = log::max_level();
    log::set_max_level(LevelFilter::Off);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        settings,
        &mut player,
        store,
        &events_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::set_max_level(log_level);

    poller.shutdown();
    player.stop();
    info!("player closed");

    run_result
}
