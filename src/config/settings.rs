use crate::config::loader::{load_settings_from_path, ConfigError};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that enables reading [`SETTINGS_FILE`].
pub const MODE_ENV: &str = "PROOF_LIBRARY_MODE";
pub const LOCAL_MODE: &str = "local";
pub const SETTINGS_FILE: &str = "proof.toml";

/// Runtime settings for the command line tool.
///
/// Outside local mode the built-in defaults are used and any settings file
/// is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// File or directory inspected when no path is given.
    pub code_file_path: PathBuf,
    pub verbose: bool,
    /// Directory of submissions, one `<name>.php` per proof.
    pub answer_dir: PathBuf,
    /// Directory of `<name>.toml` proof files.
    pub proof_dir: PathBuf,
    #[serde(skip)]
    pub default_configuration: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            code_file_path: PathBuf::from("/code"),
            verbose: false,
            answer_dir: PathBuf::from("answers"),
            proof_dir: PathBuf::from("tests"),
            default_configuration: true,
        }
    }
}

impl Settings {
    /// Resolve settings from the environment and the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        let local = env::var(MODE_ENV).is_ok_and(|mode| mode == LOCAL_MODE);
        let path = env::current_dir()
            .map(|dir| dir.join(SETTINGS_FILE))
            .unwrap_or_else(|_| PathBuf::from(SETTINGS_FILE));
        Self::load_for(local, &path)
    }

    pub fn load_for(local: bool, path: &Path) -> Result<Self, ConfigError> {
        if !local {
            return Ok(Self::default());
        }
        if !path.is_file() {
            log::debug!("local mode without {}, using defaults", path.display());
            return Ok(Self::default());
        }
        log::debug!("loading settings from {}", path.display());
        load_settings_from_path(path)
    }

    /// Answer file paired with a proof file of the same stem.
    pub fn answer_for(&self, proof: &Path) -> Option<PathBuf> {
        let stem = proof.file_stem()?;
        Some(self.answer_dir.join(stem).with_extension("php"))
    }
}
