mod app;
mod audio;
mod config;
mod library;
mod player;
mod playlists;
mod runtime;
mod ui;

fn main() {
    if let Err(e) = runtime::run() {
        eprintln!("turntable: {e}");
        std::process::exit(1);
    }
}
