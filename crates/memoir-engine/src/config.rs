//! Resolution and persistence of the `memory_home` directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use memoir_core::errors::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};

const ENV_VAR: &str = "MEMORY_HOME";
const CONFIG_RELATIVE_PATH: &str = ".config/memoir/config.toml";
const DEFAULT_RELATIVE_HOME: &str = ".memory";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedConfig {
    memory_home: Option<String>,
}

/// Resolve the memory home directory in order: the `MEMORY_HOME`
/// environment variable, the persisted global config file, then
/// `<user_home>/.memory`.
pub fn resolve_memory_home() -> MemoryResult<PathBuf> {
    if let Ok(value) = env::var(ENV_VAR) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }

    let user_home = user_home_dir()?;
    let config_path = user_home.join(CONFIG_RELATIVE_PATH);
    if let Some(home) = read_persisted_home(&config_path)? {
        return Ok(home);
    }

    Ok(user_home.join(DEFAULT_RELATIVE_HOME))
}

/// Persist `memory_home` to the global config file, creating parent
/// directories as needed.
pub fn persist_memory_home(home: &Path) -> MemoryResult<()> {
    let config_path = user_home_dir()?.join(CONFIG_RELATIVE_PATH);
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = PersistedConfig {
        memory_home: Some(home.to_string_lossy().into_owned()),
    };
    let serialized = toml::to_string_pretty(&config).map_err(|e| MemoryError::IoError {
        message: format!("serializing config: {e}"),
    })?;
    fs::write(&config_path, serialized)?;
    Ok(())
}

fn user_home_dir() -> MemoryResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| MemoryError::IoError {
        message: "could not determine user home directory".to_string(),
    })
}

fn read_persisted_home(config_path: &Path) -> MemoryResult<Option<PathBuf>> {
    if !config_path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(config_path)?;
    let parsed: PersistedConfig = toml::from_str(&contents).map_err(|e| MemoryError::IoError {
        message: format!("invalid config at {}: {e}", config_path.display()),
    })?;
    Ok(parsed.memory_home.map(PathBuf::from))
}
