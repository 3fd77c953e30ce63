//! Adding tracks from an online video source.
//!
//! `Downloader` owns the pipeline (fetch into a temp dir, move into the
//! tracks folder, then insert the record) while the fetch itself goes
//! through [`AudioFetcher`], implemented for the `yt-dlp` program.

mod error;
mod save;
mod ytdlp;

pub use error::DownloadError;
pub use save::Downloader;
pub use ytdlp::{AudioFetcher, YtDlp};
