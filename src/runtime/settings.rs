use std::path::Path;

use crate::config::{self, Settings};

/// Load settings, falling back to defaults. Problems come back as warnings
/// because logging is not set up yet; the caller reports them.
pub fn load_settings(explicit: Option<&Path>) -> (Settings, Vec<String>) {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(config::resolve_config_path);

    match Settings::load_from(path.as_deref()) {
        Ok(s) => match s.validate() {
            Ok(()) => (s, Vec::new()),
            Err(msg) => (
                Settings::default(),
                vec![format!("invalid config, using defaults: {msg}")],
            ),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            Settings::default(),
            vec![format!("failed to load config, using defaults: {e}")],
        ),
    }
}
