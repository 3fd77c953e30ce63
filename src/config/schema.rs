use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jukebox/config.toml` or `~/.config/jukebox/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags, where one exists
/// 2) Environment variables (prefix `JUKEBOX__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub download: DownloadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// The library table.
    pub path: PathBuf,
    /// Folder holding one audio file per track, named `{id}.{audio_extension}`.
    pub tracks_dir: PathBuf,
    /// Without the dot.
    pub audio_extension: String,
    /// Write a column header row when saving.
    pub write_header: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("library.csv"),
            tracks_dir: PathBuf::from("tracks"),
            audio_extension: "mp3".to_string(),
            write_header: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the clock is ticked (milliseconds).
    pub tick_interval_ms: u64,
    /// Output volume at startup, 0.0 to 1.0.
    pub initial_volume: f32,
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_step_seconds: u64,
    /// After a seek, go back to the backend's cursor once it agrees with the
    /// skip-derived position. Off keeps the skip-derived position until the
    /// next track.
    pub resync_after_seek: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            initial_volume: 0.5,
            seek_step_seconds: 5,
            resync_after_seek: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// The `yt-dlp` executable, looked up on `PATH` unless absolute.
    pub program: String,
    /// Directory containing `ffmpeg`, passed on as `--ffmpeg-location`.
    pub ffmpeg_location: Option<PathBuf>,
    pub temp_dir: PathBuf,
    pub audio_quality: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            ffmpeg_location: None,
            temp_dir: PathBuf::from("temp"),
            audio_quality: "192K".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`. `RUST_LOG` wins
    /// when set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
