use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{get_config_path, Config};

const HEADER: &str = "\
# pr-stats configuration
#
# internal_members: logins of team members. Everyone else counts as external.
# record_store / snapshot: relative paths are resolved against this file's directory.
";

/// Write a default config file.
///
/// Uses `path` if given, otherwise the default location. Refuses to replace an
/// existing file unless `force` is set. Returns the path written.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = path.unwrap_or_else(get_config_path);

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite",
            config_path.display()
        );
    }

    let yaml = serde_saphyr::to_string(&Config::default())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    write_file(&config_path, &format!("{}\n{}", HEADER, yaml))?;
    info!("Config written to {}", config_path.display());

    Ok(config_path)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
