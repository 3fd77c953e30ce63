use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::library::{LibraryRecord, LibraryStore, TrackFiles};

use super::error::DownloadError;
use super::ytdlp::AudioFetcher;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const UNKNOWN_ARTIST: &str = "Unknown";

/// Downloads tracks into the tracks folder and records them in the library.
pub struct Downloader {
    fetcher: Box<dyn AudioFetcher>,
    files: TrackFiles,
    temp_dir: PathBuf,
}

impl Downloader {
    pub fn new(fetcher: Box<dyn AudioFetcher>, files: TrackFiles, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            files,
            temp_dir: temp_dir.into(),
        }
    }

    /// Download `external_id` and add it to `store` under the next free id.
    ///
    /// Returns the new id, or `None` after logging why it failed. The
    /// library only changes when every step succeeded.
    pub fn download_and_save(
        &self,
        store: &mut LibraryStore,
        external_id: &str,
        title: &str,
        artist: Option<&str>,
    ) -> Option<String> {
        match self.try_download_and_save(store, external_id, title, artist) {
            Ok(id) => {
                info!("saved {external_id} as track {id}");
                Some(id)
            }
            Err(e) => {
                error!("download of {external_id} failed: {e}");
                None
            }
        }
    }

    pub fn try_download_and_save(
        &self,
        store: &mut LibraryStore,
        external_id: &str,
        title: &str,
        artist: Option<&str>,
    ) -> Result<String, DownloadError> {
        let external_id = external_id.trim();
        if external_id.is_empty() || external_id.contains(char::is_whitespace) {
            return Err(DownloadError::InvalidId(external_id.to_string()));
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(DownloadError::EmptyTitle);
        }

        let id = store.next_track_id()?;
        create_dir(&self.temp_dir)?;
        create_dir(self.files.dir())?;

        let template = self.temp_dir.join(format!("temp_{id}.%(ext)s"));
        let url = format!("{WATCH_URL}{external_id}");
        info!("downloading {url} as track {id}");
        let uploader = self.fetcher.fetch(&url, &template)?;

        let downloaded = self
            .temp_dir
            .join(format!("temp_{id}.{}", self.files.extension()));
        if !downloaded.is_file() {
            return Err(DownloadError::MissingOutput { path: downloaded });
        }
        let target = self.files.path_for(&id);
        move_file(&downloaded, &target)?;

        let artist = artist
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .or(uploader)
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        if let Err(e) = store.insert(&id, LibraryRecord::new(title, artist, 0)) {
            if let Err(rm) = fs::remove_file(&target) {
                warn!("could not remove {}: {rm}", target.display());
            }
            return Err(e.into());
        }
        Ok(id)
    }
}

fn create_dir(dir: &Path) -> Result<(), DownloadError> {
    fs::create_dir_all(dir).map_err(|source| DownloadError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Rename, falling back to copy and delete across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<(), DownloadError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    let io_err = |source: io::Error| DownloadError::Io {
        path: to.to_path_buf(),
        source,
    };
    fs::copy(from, to).map_err(io_err)?;
    if let Err(e) = fs::remove_file(from) {
        warn!("could not remove {}: {e}", from.display());
    }
    Ok(())
}
