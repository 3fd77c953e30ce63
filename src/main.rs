mod audio;
mod cli;
mod clock;
mod config;
mod downloader;
mod library;
mod player;
mod playlist;
mod runtime;
mod ui;

fn main() {
    if let Err(e) = runtime::run() {
        eprintln!("jukebox: {e}");
        std::process::exit(1);
    }
}
