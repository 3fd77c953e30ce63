//! UI rendering helpers for the terminal player.
//!
//! Everything drawn comes in through [`PlayerView`], plain data the runtime
//! assembles from the player and library each frame.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::clock::ClockState;
use crate::player::NowPlaying;

/// One frame's worth of player state.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    pub now_playing: Option<&'a NowPlaying>,
    pub volume: f32,
    /// Playlist entries, already formatted.
    pub playlist: &'a [String],
    pub current: Option<usize>,
    pub status: &'a str,
    pub seek_step_seconds: u64,
    /// Detail text for the popup, when it is open.
    pub details: Option<&'a str>,
}

const CONTROLS: [(&str, &str); 8] = [
    ("space/p", "play/pause"),
    ("h", "prev"),
    ("l/n", "next"),
    ("H/L", ""),
    ("0-9", "jump to 0%-90%"),
    ("+/-", "volume"),
    ("K", "details"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating the seek step.
pub(crate) fn controls_text(seek_step_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(keys, action)| {
            if *keys == "H/L" {
                format!("[H/L] seek -/+{seek_step_seconds}s")
            } else {
                format!("[{keys}] {action}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

pub(crate) fn state_label(state: ClockState) -> &'static str {
    match state {
        ClockState::Stopped => "Stopped",
        ClockState::Playing => "Playing",
        ClockState::Paused => "Paused",
        ClockState::Ended => "Ended",
    }
}

/// The line above the progress gauge.
pub(crate) fn now_playing_text(now: Option<&NowPlaying>, volume: f32) -> String {
    let volume = format!("vol {}%", (volume.clamp(0.0, 1.0) * 100.0).round() as u32);
    match now {
        Some(n) => format!("{}: {} • {volume}", state_label(n.state), n.info),
        None => format!("Stopped • {volume}"),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width.saturating_sub(2)).max(10);
    let height = height.min(r.height.saturating_sub(2)).max(5);

    Rect {
        x: r.x + (r.width.saturating_sub(width) / 2),
        y: r.y + (r.height.saturating_sub(height) / 2),
        width,
        height,
    }
    .intersection(r)
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the whole player screen.
pub fn draw(frame: &mut Frame, view: &PlayerView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new("a little jukebox")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" jukebox ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing: info line over a progress gauge.
    let np_block = left_padded(" now playing ");
    let np_inner = np_block.inner(chunks[1]);
    frame.render_widget(np_block, chunks[1]);
    let np_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(np_inner);

    frame.render_widget(
        Paragraph::new(now_playing_text(view.now_playing, view.volume)),
        np_rows[0],
    );
    let (ratio, label) = match view.now_playing {
        Some(n) => (
            n.progress.fraction.clamp(0.0, 1.0),
            format!("{} / {}", n.progress.elapsed_label(), n.progress.total_label()),
        ),
        None => (0.0, "0:00 / 0:00".to_string()),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, np_rows[1]);

    let items: Vec<ListItem> = view
        .playlist
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" playlist "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !view.playlist.is_empty() {
        state.select(view.current);
    }
    frame.render_stateful_widget(list, chunks[2], &mut state);

    if let Some(details) = view.details {
        let popup_area = centered_rect_sized(60, 8, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(details)
            .block(left_padded(" details (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }

    let status = Paragraph::new(view.status).block(left_padded(" status "));
    frame.render_widget(status, chunks[3]);

    let footer = Paragraph::new(controls_text(view.seek_step_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests;
