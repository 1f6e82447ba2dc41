//! Show or initialize the configuration file.

use signlang_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    if init {
        let path = config_file_path();
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        let written = AppConfig::default().save()?;
        println!("✓ Wrote default config to {}", written.display());
        return Ok(());
    }

    println!("Config file: {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
