use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use super::error::DownloadError;

/// Fetches audio for a URL into files named by an output template.
pub trait AudioFetcher {
    /// Download and transcode `url`. `output_template` ends in `.%(ext)s`,
    /// which the fetcher replaces with the audio format's extension.
    ///
    /// Returns the uploader's name when the source reports one.
    fn fetch(&self, url: &str, output_template: &Path) -> Result<Option<String>, DownloadError>;
}

/// Runs the external `yt-dlp` program.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
    audio_format: String,
    audio_quality: String,
    ffmpeg_location: Option<PathBuf>,
}

impl YtDlp {
    pub fn new(program: impl Into<String>, audio_format: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            audio_format: audio_format.into(),
            audio_quality: "192K".to_string(),
            ffmpeg_location: None,
        }
    }

    pub fn audio_quality(mut self, quality: impl Into<String>) -> Self {
        self.audio_quality = quality.into();
        self
    }

    pub fn ffmpeg_location(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    pub(super) fn args(&self, url: &str, output_template: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-f",
            "bestaudio/best",
            "-x",
            "--audio-format",
            self.audio_format.as_str(),
            "--audio-quality",
            self.audio_quality.as_str(),
            "--no-playlist",
            "--no-simulate",
            "--print",
            "uploader",
            "-o",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(output_template.as_os_str().to_os_string());
        if let Some(location) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(location.as_os_str().to_os_string());
        }
        args.push("--".into());
        args.push(url.into());
        args
    }
}

/// The last non-empty line `--print uploader` wrote, unless yt-dlp had none.
pub(super) fn parse_uploader(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .filter(|line| *line != "NA")
        .map(str::to_string)
}

impl AudioFetcher for YtDlp {
    fn fetch(&self, url: &str, output_template: &Path) -> Result<Option<String>, DownloadError> {
        debug!("running {} for {url}", self.program);
        let output = Command::new(&self.program)
            .args(self.args(url, output_template))
            .output()
            .map_err(|source| DownloadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DownloadError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(parse_uploader(&String::from_utf8_lossy(&output.stdout)))
    }
}
