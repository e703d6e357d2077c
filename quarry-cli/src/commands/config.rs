use anyhow::{Context, Result};
use quarry::Config;
use std::path::Path;

/// Write the default config to `path`
pub fn run_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite it.",
            path
        );
    }

    Config::default()
        .save(path)
        .with_context(|| format!("Failed to write config to {:?}", path))?;

    tracing::info!("Wrote default config to {:?}", path);
    Ok(())
}

/// Print the config that searches would use
pub fn run_config_show(path: &Path) -> Result<()> {
    let config = Config::load_from(path)
        .with_context(|| format!("Failed to load config from {:?}", path))?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
