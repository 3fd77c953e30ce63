use log::warn;

use crate::cli::Cli;
use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Command-line paths take precedence over the loaded settings.
pub fn apply_cli_overrides(settings: &mut config::Settings, cli: &Cli) {
    if let Some(path) = &cli.library {
        settings.library.path = path.clone();
    }
    if let Some(dir) = &cli.tracks_dir {
        settings.library.tracks_dir = dir.clone();
    }
}
