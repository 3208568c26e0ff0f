//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use trendwatch_config::AppConfig;

pub async fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}
