mod init;
mod schema;
mod validation;

pub use init::write_default_config;
pub use schema::{Config, ReportConfig};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (~/.config/pr-stats/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("pr-stats")
}

/// Get the default config file path (~/.config/pr-stats/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/pr-stats/config.yaml)
///
/// Relative `record_store` and `snapshot` paths are resolved against the
/// directory containing the config file.
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `pr-stats init` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config = parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);
    debug!(
        "Loaded config from {} (store: {}, snapshot: {})",
        config_path.display(),
        config.record_store.display(),
        config.snapshot.display()
    );

    Ok(config)
}

/// Parse configuration from YAML text without touching the filesystem
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = serde_saphyr::from_str(content)?;
    Ok(config)
}
