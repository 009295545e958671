//! Config file handling.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::types::Config;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "COMMTRACK_CONFIG";

/// Resolve the config path: `$COMMTRACK_CONFIG` or `~/.commtrack/config.json`.
pub fn config_path() -> Result<PathBuf, String> {
    if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
        if !explicit.trim().is_empty() {
            return Ok(PathBuf::from(explicit));
        }
    }
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".commtrack").join("config.json"))
}

/// Load config, falling back to defaults when the file does not exist yet.
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    let config: Config =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;

    if config.recent_communication_limit == 0 {
        return Err("recentCommunicationLimit must be at least 1".to_string());
    }

    Ok(config)
}

/// Load (or default) the config, apply `mutator`, and write it back atomically.
pub fn create_or_update_config(
    path: &Path,
    mutator: impl FnOnce(&mut Config),
) -> Result<Config, String> {
    let mut config = load_config_from(path)?;
    mutator(&mut config);
    save_config(path, &config)?;
    Ok(config)
}

/// Write via a temp file in the same directory, then rename over the target.
pub fn save_config(path: &Path, config: &Config) -> Result<(), String> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create config dir: {}", e))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| format!("Failed to create temp config: {}", e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("Failed to write config: {}", e))?;
    tmp.persist(path)
        .map_err(|e| format!("Failed to replace config: {}", e))?;

    Ok(())
}
