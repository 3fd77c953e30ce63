use super::*;
use crate::clock::{ClockState, PlaybackClock};
use crate::player::NowPlaying;
use ratatui::{Terminal, backend::TestBackend};
use std::time::Instant;

fn now_playing(position: f64, length: f64, state: ClockState) -> NowPlaying {
    let mut clock = PlaybackClock::default();
    clock.load("01", length);
    let progress = clock.tick(Instant::now(), Some(position)).progress;
    NowPlaying {
        track_id: "01".into(),
        info: "Shape of You - Ed Sheeran ***".into(),
        state,
        progress,
    }
}

fn render(view: &PlayerView) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|f| draw(f, view)).unwrap();
    let buffer = terminal.backend().buffer().clone();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn controls_text_mentions_seek_step() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] seek -/+7s"));
    assert!(text.contains("[space/p] play/pause"));
    assert!(text.contains("[q] quit"));
}

#[test]
fn now_playing_text_shows_state_info_and_volume() {
    let np = now_playing(92.0, 180.0, ClockState::Paused);
    assert_eq!(
        now_playing_text(Some(&np), 0.5),
        "Paused: Shape of You - Ed Sheeran *** • vol 50%"
    );
    assert_eq!(now_playing_text(None, 1.0), "Stopped • vol 100%");
}

#[test]
fn draw_renders_progress_playlist_and_status() {
    let np = now_playing(92.0, 180.0, ClockState::Playing);
    let playlist = vec!["01: Shape of You".to_string(), "02: Clocks".to_string()];
    let view = PlayerView {
        now_playing: Some(&np),
        volume: 0.5,
        playlist: &playlist,
        current: Some(0),
        status: "Seeked to 1:32",
        seek_step_seconds: 5,
        details: None,
    };

    let screen = render(&view);
    assert!(screen.contains("jukebox"));
    assert!(screen.contains("Playing: Shape of You - Ed Sheeran ***"));
    assert!(screen.contains("1:32 / 3:00"));
    assert!(screen.contains("> 01: Shape of You"));
    assert!(screen.contains("02: Clocks"));
    assert!(screen.contains("Seeked to 1:32"));
    assert!(!screen.contains("details (K closes)"));
}

#[test]
fn draw_shows_details_popup() {
    let playlist = vec!["01: Shape of You".to_string()];
    let view = PlayerView {
        now_playing: None,
        volume: 0.5,
        playlist: &playlist,
        current: Some(0),
        status: "",
        seek_step_seconds: 5,
        details: Some("Track: Shape of You\nArtist: Ed Sheeran"),
    };

    let screen = render(&view);
    assert!(screen.contains("details (K closes)"));
    assert!(screen.contains("Artist: Ed Sheeran"));
    assert!(screen.contains("0:00 / 0:00"));
}

#[test]
fn draw_survives_a_tiny_terminal() {
    let view = PlayerView {
        now_playing: None,
        volume: 0.0,
        playlist: &[],
        current: None,
        status: "",
        seek_step_seconds: 5,
        details: Some("x"),
    };
    let mut terminal = Terminal::new(TestBackend::new(12, 6)).unwrap();
    terminal.draw(|f| draw(f, &view)).unwrap();
}
