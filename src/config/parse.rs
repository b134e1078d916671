//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, RundownError};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["rundown.yml", "rundown.yaml", ".rundown.yml"];

/// Find the configuration file by searching current and parent directories,
/// then the user's global config directory
pub fn find_config_file() -> ConfigResult<PathBuf> {
    let current_dir = env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?;

    match find_config_file_from(current_dir) {
        Ok(path) => Ok(path),
        Err(ConfigError::NotFound(searched)) => match global_config_file() {
            Some(path) if path.is_file() => {
                debug!("using global task file {}", path.display());
                Ok(path)
            }
            _ => Err(ConfigError::NotFound(searched)),
        },
        Err(e) => Err(e),
    }
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Location of the user-wide task file
pub fn global_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rundown").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAMES[0]))
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, RundownError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, RundownError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Parse configuration with automatic file discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), RundownError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

/// Directory the task file lives in; tasks run relative to it
pub fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Read `.env` from a directory without touching the process environment.
/// A missing file yields an empty map.
pub fn load_dotenv(dir: &Path) -> ConfigResult<HashMap<String, String>> {
    let path = dir.join(".env");
    let iter = match dotenvy::from_path_iter(&path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => {
            return Err(ConfigError::Dotenv {
                path,
                error: e.to_string(),
            })
        }
    };

    iter.map(|item| {
        item.map_err(|e| ConfigError::Dotenv {
            path: path.clone(),
            error: e.to_string(),
        })
    })
    .collect()
}
