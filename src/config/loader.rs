use crate::config::schema::{ProofFile, ValidationError};
use crate::config::settings::Settings;
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Which TOML document failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Proof,
    Settings,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Proof => f.write_str("proof file"),
            Document::Settings => f.write_str("settings"),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        document: Document,
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        document: Document,
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            ConfigError::Toml {
                document,
                path: None,
                source,
            } => ConfigError::Toml {
                document,
                path: Some(path.to_path_buf()),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io {
                document,
                path,
                source,
            } => write!(f, "failed to read {document} {}: {source}", path.display()),
            ConfigError::Toml {
                document,
                path,
                source,
            } => match path {
                Some(path) => write!(f, "failed to parse {document} ({}): {source}", path.display()),
                None => write!(f, "failed to parse {document}: {source}"),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid proof file ({}):\n{source}", path.display()),
                None => write!(f, "invalid proof file:\n{source}"),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

fn parse<T: DeserializeOwned>(document: Document, input: &str) -> Result<T, ConfigError> {
    toml_edit::de::from_str(input).map_err(|source| ConfigError::Toml {
        document,
        path: None,
        source,
    })
}

fn read(document: Document, path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        document,
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and validate a proof file.
pub fn load_from_str(input: &str) -> Result<ProofFile, ConfigError> {
    let proof: ProofFile = parse(Document::Proof, input)?;
    proof
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(proof)
}

pub fn load_from_path(path: &Path) -> Result<ProofFile, ConfigError> {
    let contents = read(Document::Proof, path)?;
    load_from_str(&contents).map_err(|err| err.with_path(path))
}

/// Settings read from a file are never the default configuration.
pub fn load_settings_from_str(input: &str) -> Result<Settings, ConfigError> {
    let mut settings: Settings = parse(Document::Settings, input)?;
    settings.default_configuration = false;
    Ok(settings)
}

pub fn load_settings_from_path(path: &Path) -> Result<Settings, ConfigError> {
    let contents = read(Document::Settings, path)?;
    load_settings_from_str(&contents).map_err(|err| err.with_path(path))
}
