//! Runtime configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

/// Where the runtime keeps its files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Base directory for runtime data.
    pub data_dir: PathBuf,
    /// JSON file backing the settings store.
    pub settings_path: PathBuf,
    /// Directory for log files; logging goes to stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl RuntimeConfig {
    pub const SETTINGS_FILE: &'static str = "settings.json";

    /// Configuration rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            settings_path: data_dir.join(Self::SETTINGS_FILE),
            data_dir,
            log_dir: None,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// - `SPELLPOINTS_DATA_DIR` - base directory (default: platform data dir)
    /// - `SPELLPOINTS_SETTINGS_PATH` - settings file (default: `<data dir>/settings.json`)
    /// - `SPELLPOINTS_LOG_DIR` - log directory (default: none)
    pub fn from_env() -> Self {
        let data_dir = read_env::<PathBuf>("SPELLPOINTS_DATA_DIR").unwrap_or_else(default_data_dir);
        let mut config = Self::new(data_dir);

        if let Some(path) = read_env::<PathBuf>("SPELLPOINTS_SETTINGS_PATH") {
            config.settings_path = path;
        }
        config.log_dir = read_env::<PathBuf>("SPELLPOINTS_LOG_DIR");

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}

/// Platform data directory, e.g. `~/.local/share/spellpoints` on Linux.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "spellpoints")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./spellpoints-data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok().filter(|value| !value.is_empty())?.parse().ok()
}
