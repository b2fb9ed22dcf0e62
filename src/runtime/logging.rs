use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::{LogSettings, default_log_path};

/// Send `log` output to a file; the terminal belongs to the UI. Returns the
/// file in use, or `None` when logging stays off.
pub fn init(settings: &LogSettings) -> Option<PathBuf> {
    let path = settings.file.clone().or_else(default_log_path)?;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("turntable: logging disabled, cannot create {}: {e}", parent.display());
            return None;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("turntable: logging disabled, cannot open {}: {e}", path.display());
            return None;
        }
    };

    let env = Env::default().default_filter_or(settings.level.as_str());
    let result = Builder::from_env(env)
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    if let Err(e) = result {
        eprintln!("turntable: logging disabled: {e}");
        return None;
    }
    Some(path)
}
