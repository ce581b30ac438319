use crate::config::schema::TraceConfig;
use crate::config::validation::validate_config;
use crate::error::{Result, TraceError};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default configuration file path based on platform
pub fn get_config_path() -> PathBuf {
    let config_dir = if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|p| p.join("com.browsion.trace"))
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        dirs::config_dir()
            .map(|p| p.join("browsion-trace"))
            .unwrap_or_else(|| PathBuf::from("."))
    };

    config_dir.join("config.toml")
}

/// Load configuration from `path`, falling back to defaults if it does not exist
pub fn load_config(path: &Path) -> Result<TraceConfig> {
    if !path.exists() {
        tracing::info!("Config file not found at {:?}, using defaults", path);
        return Ok(TraceConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        TraceError::Config(format!("Failed to read config from {:?}: {}", path, e))
    })?;

    let config: TraceConfig = toml::from_str(&content)?;
    validate_config(&config)?;

    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to `path`
pub fn save_config(path: &Path, config: &TraceConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TraceError::Config(format!(
                "Failed to create config directory {:?}: {}",
                parent, e
            ))
        })?;
    }

    let content = toml::to_string_pretty(config)?;

    fs::write(path, content).map_err(|e| {
        TraceError::Config(format!("Failed to write config to {:?}: {}", path, e))
    })?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}
