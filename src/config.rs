//! Settings for the library location, playback, downloads and logging.
//!
//! Values come from an optional TOML file and `JUKEBOX__*` environment
//! variables; see [`Settings`] for precedence.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;
