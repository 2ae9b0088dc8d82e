//! Core TOML config loading: read from path or platform default.

use crate::schema::ClientConfig;
use crate::validation;
use chesspp_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// After loading, the config is validated; if validation fails, a warning
/// is logged and the parsed config is returned as-is.
pub fn load_from_path(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: ClientConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!(
            "config validation warning: {e} — using parsed config with potentially invalid values"
        );
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// If the file does not exist, creates a default config file and returns
/// defaults.
pub fn load_default() -> Result<ClientConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::ParseError(msg)) if msg.contains("failed to read") => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(ClientConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Serialize a config back to a TOML file.
pub fn save_to_path(config: &ClientConfig, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize TOML: {e}")))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, content)
        .map_err(|e| ConfigError::ParseError(format!("failed to write {}: {e}", path.display())))?;

    info!("saved config to {}", path.display());
    Ok(())
}
