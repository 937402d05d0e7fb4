use std::path::{Path, PathBuf};
use tracing::{info, warn};
use warden_core::{Result, SafetyMode, WardenError};

use crate::schema::SafetyConfig;

/// Resolve the config path: explicit path > WARDEN_CONFIG env > ./warden.json
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    if let Ok(p) = std::env::var("WARDEN_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("warden.json")
}

/// Load the safety configuration from disk, falling back to the Strict-mode
/// defaults, then apply environment variable overrides.
pub fn load_config(path: Option<&Path>) -> Result<SafetyConfig> {
    let config_path = resolve_path(path);
    let config = if config_path.exists() {
        info!(?config_path, "loading safety configuration");
        let raw = std::fs::read_to_string(&config_path)?;
        serde_json::from_str::<SafetyConfig>(&raw).map_err(|e| {
            WardenError::Config(format!("failed to parse {}: {}", config_path.display(), e))
        })?
    } else {
        warn!(?config_path, "config file not found, using strict defaults");
        SafetyConfig::default()
    };

    Ok(apply_env_overrides(config))
}

/// Apply env var overrides (WARDEN_MODE, WARDEN_SAFETY_ENABLED).
fn apply_env_overrides(mut config: SafetyConfig) -> SafetyConfig {
    if let Ok(v) = std::env::var("WARDEN_MODE") {
        let mode = match v.to_ascii_lowercase().as_str() {
            "strict" => Some(SafetyMode::Strict),
            "moderate" => Some(SafetyMode::Moderate),
            "relaxed" => Some(SafetyMode::Relaxed),
            "off" => Some(SafetyMode::Off),
            other => {
                warn!(value = other, "unrecognized WARDEN_MODE, ignoring");
                None
            }
        };
        if let Some(mode) = mode {
            config.apply_mode(mode, "env");
        }
    }
    if let Ok(v) = std::env::var("WARDEN_SAFETY_ENABLED") {
        if let Ok(enabled) = v.parse::<bool>() {
            config.enabled = enabled;
        }
    }
    config
}
