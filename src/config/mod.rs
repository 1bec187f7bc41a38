mod schema;

pub use schema::{Config, ThemeChoice};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/fantasy-mvp/ on Linux)
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fantasy-mvp")
}

/// Get the default config file path (~/.config/fantasy-mvp/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Ensure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/fantasy-mvp/config.yaml)
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be read
/// - The YAML cannot be parsed or has unknown keys
/// - A value is out of range
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        tracing::debug!("No config at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Invalid config in {}", config_path.display()))
}

fn parse_config(content: &str) -> Result<Config> {
    // An empty document is an empty mapping
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config =
        serde_saphyr::from_str(content).context("Failed to parse config: invalid YAML")?;

    if config.max_results == 0 {
        anyhow::bail!("max_results must be at least 1");
    }

    Ok(config)
}
