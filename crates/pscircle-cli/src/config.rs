//! Configuration file discovery for the CLI.
//!
//! A configuration is looked up at the `--config` path, then at
//! `pscircle/config.toml` under the working directory, then in the platform
//! configuration directory. The first file found is parsed and validated
//! before any listing is read, so a bad value is reported against its file.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use pscircle::{PscircleError, config::AppConfig};

/// Configuration lookup relative to the working directory.
const LOCAL_CONFIG: &str = "pscircle/config.toml";

/// File name inside the platform configuration directory.
const CONFIG_FILE: &str = "config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Failed to read configuration {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for PscircleError {
    fn from(err: ConfigError) -> Self {
        PscircleError::Config(err.to_string())
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Explicit,
    Local,
    System,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Origin::Explicit => "explicit",
            Origin::Local => "local",
            Origin::System => "system",
        })
    }
}

/// Loads the first configuration file found, or the defaults.
///
/// # Errors
///
/// Returns [`PscircleError::Config`] when an explicit path does not exist,
/// or when the file found cannot be parsed or holds values that cannot be
/// laid out.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, PscircleError> {
    let Some((origin, path)) = find_config(explicit_path) else {
        debug!("No configuration file found, using default configuration");
        return Ok(AppConfig::default());
    };

    info!(origin:% = origin, path:% = path.display(); "Loading configuration");
    Ok(read_config(&path)?)
}

/// Picks the configuration file to load. An explicit path is returned even
/// when it does not exist, so the caller reports it.
fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Option<(Origin, PathBuf)> {
    if let Some(path) = explicit_path {
        return Some((Origin::Explicit, path.as_ref().to_path_buf()));
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return Some((Origin::Local, local));
    }

    let Some(dirs) = ProjectDirs::from("com", "pscircle", "pscircle") else {
        debug!("Could not determine platform-specific config directory");
        return None;
    };
    let system = dirs.config_dir().join(CONFIG_FILE);
    if system.is_file() {
        return Some((Origin::System, system));
    }

    debug!(path:% = system.display(); "System configuration file not found");
    None
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ConfigError::MissingFile(path.into()),
        _ => ConfigError::Read {
            path: path.into(),
            message: err.to_string(),
        },
    })?;

    let config: AppConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.into(),
        message: err.to_string(),
    })?;

    config.validate().map_err(|err| ConfigError::Invalid {
        path: path.into(),
        message: match err {
            PscircleError::Config(message) => message,
            other => other.to_string(),
        },
    })?;

    Ok(config)
}
