use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `TURNTABLE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and the optional config file at the resolved path.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load settings from environment and an explicit (optional) config file.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TURNTABLE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.audio.default_volume) {
            return Err("audio.default_volume must be within 0.0..=1.0".to_string());
        }
        if !(0.25..=2.0).contains(&self.audio.playback_rate) {
            return Err("audio.playback_rate must be within 0.25..=2.0".to_string());
        }
        if self.controls.volume_step <= 0.0 || self.controls.rate_step <= 0.0 {
            return Err("controls.volume_step and controls.rate_step must be > 0".to_string());
        }
        if self.playlists.history_limit == 0 {
            return Err("playlists.history_limit must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `TURNTABLE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TURNTABLE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/turntable/config.toml`
/// or `~/.config/turntable/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("turntable").join("config.toml"))
}

/// `$XDG_DATA_HOME/turntable/playlists.toml` or `~/.local/share/turntable/playlists.toml`.
pub fn default_playlists_path() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("turntable").join("playlists.toml"))
}

/// `$XDG_STATE_HOME/turntable/turntable.log` or `~/.local/state/turntable/turntable.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("turntable").join("turntable.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var).filter(|v| !v.is_empty()) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
