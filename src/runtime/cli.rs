use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "turntable")]
#[command(version)]
#[command(about = "Terminal music player")]
pub struct Cli {
    /// Folders to scan or files to play. `-` reads one track from stdin.
    /// Without paths the configured (or default) music folders are scanned.
    pub paths: Vec<PathBuf>,

    /// Path to the config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
