use std::env;

use log::{LevelFilter, debug};

use crate::config;

/// Install the colored stderr logger. `RUST_LOG` is honored when set;
/// otherwise everything is let through until [`apply_log_level`] narrows it.
///
/// Returns whether `RUST_LOG` was set.
pub fn init_logging() -> bool {
    let from_env = env::var_os("RUST_LOG").is_some();
    let mut clog = colog::default_builder();
    if !from_env {
        clog.filter(None, LevelFilter::Trace);
    }
    clog.init();
    if !from_env {
        log::set_max_level(LevelFilter::Info);
    }

    // Logging is silenced while the player screen is up, so keep the
    // default hook's output too.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{thread_name}': {panic_info}");
        default_hook(panic_info);
    }));

    from_env
}

/// Use the configured level unless `RUST_LOG` already chose one.
pub fn apply_log_level(settings: &config::Settings, from_env: bool) {
    if from_env {
        return;
    }
    if let Some(level) = settings.log_level() {
        log::set_max_level(level);
        debug!("log level set to {level}");
    }
}
