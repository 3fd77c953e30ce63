//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A local jukebox: a track library in a flat file and a terminal player.
#[derive(Parser, Debug)]
#[command(name = "jukebox", version, about)]
pub struct Cli {
    /// Library table to use instead of the configured one
    #[arg(long, global = true, value_name = "FILE", env = "JUKEBOX_LIBRARY")]
    pub library: Option<PathBuf>,

    /// Folder with the track audio files
    #[arg(long, global = true, value_name = "DIR")]
    pub tracks_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List every track in the library
    List,
    /// Show one track's details
    View { id: String },
    /// Set a track's rating (0 to 5)
    Rate {
        id: String,
        /// Parsed by the library so non-numbers get the same error as bad ratings
        #[arg(allow_hyphen_values = true)]
        rating: String,
    },
    /// Remove a track and its audio file
    Remove { id: String },
    /// Open the player with these tracks queued, or the whole library
    Play { ids: Vec<String> },
    /// Download a video's audio and add it to the library
    Download {
        video_id: String,
        title: String,
        /// Defaults to the uploader's name
        #[arg(long)]
        artist: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jukebox").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn subcommands_parse() {
        assert_eq!(parse(&["list"]).command, Command::List);
        assert_eq!(
            parse(&["view", "07"]).command,
            Command::View { id: "07".into() }
        );
        assert_eq!(
            parse(&["rate", "07", "-1"]).command,
            Command::Rate {
                id: "07".into(),
                rating: "-1".into()
            }
        );
        assert_eq!(
            parse(&["play", "01", "03"]).command,
            Command::Play {
                ids: vec!["01".into(), "03".into()]
            }
        );
        assert_eq!(parse(&["play"]).command, Command::Play { ids: vec![] });
        assert_eq!(
            parse(&["download", "dQw4w9WgXcQ", "Never Gonna", "--artist", "Rick"]).command,
            Command::Download {
                video_id: "dQw4w9WgXcQ".into(),
                title: "Never Gonna".into(),
                artist: Some("Rick".into())
            }
        );
    }

    #[test]
    fn global_paths_go_anywhere() {
        let cli = parse(&["list", "--library", "/tmp/lib.csv", "--tracks-dir", "/tmp/t"]);
        assert_eq!(cli.library, Some(PathBuf::from("/tmp/lib.csv")));
        assert_eq!(cli.tracks_dir, Some(PathBuf::from("/tmp/t")));
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["jukebox"]).is_err());
        assert!(Cli::try_parse_from(["jukebox", "rate", "07"]).is_err());
    }
}
