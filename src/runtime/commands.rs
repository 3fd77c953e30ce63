//! The one-shot library commands.

use std::error::Error;

use log::info;

use crate::config;
use crate::downloader::{Downloader, YtDlp};
use crate::library::{FileRemoval, LibraryError, LibraryStore, TrackFiles, parse_rating, remove_track};

pub fn list(store: &LibraryStore) {
    if store.is_empty() {
        println!("The library is empty.");
    } else {
        print!("{}", store.list_all());
    }
}

pub fn view(store: &LibraryStore, id: &str) -> Result<(), LibraryError> {
    let details = store
        .details(id)
        .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
    println!("{details}");
    Ok(())
}

pub fn rate(store: &mut LibraryStore, id: &str, rating: &str) -> Result<(), LibraryError> {
    let rating = parse_rating(rating)?;
    store.set_rating(id, rating.into())?;
    if let Some(rec) = store.get(id) {
        println!("{id} {}", rec.info());
    }
    Ok(())
}

pub fn remove(store: &mut LibraryStore, files: &TrackFiles, id: &str) -> Result<(), LibraryError> {
    let report = remove_track(store, files, id)?;
    println!("Removed {id}: {}", report.record.info());
    match &report.file {
        FileRemoval::Removed => info!("deleted {}", files.path_for(id).display()),
        FileRemoval::Absent => println!("{id}: {}", report.file),
        FileRemoval::Failed(_) => {}
    }
    if report.diverged() {
        println!(
            "{}: {}; the library entry is already gone",
            report.id, report.file
        );
    }
    Ok(())
}

pub fn download(
    store: &mut LibraryStore,
    files: &TrackFiles,
    settings: &config::DownloadSettings,
    video_id: &str,
    title: &str,
    artist: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let fetcher = YtDlp::new(settings.program.clone(), files.extension())
        .audio_quality(settings.audio_quality.clone())
        .ffmpeg_location(settings.ffmpeg_location.clone());
    let downloader = Downloader::new(Box::new(fetcher), files.clone(), &settings.temp_dir);

    match downloader.download_and_save(store, video_id, title, artist) {
        Some(id) => {
            println!("Added track {id}: {title}");
            Ok(())
        }
        None => Err(format!("could not download {video_id}").into()),
    }
}
