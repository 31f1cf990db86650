use anyhow::Result;
use std::path::PathBuf;

use crate::config::Settings;

/// Print the effective configuration with secrets redacted.
pub async fn handle_config_command(config: Option<PathBuf>) -> Result<()> {
    let settings = Settings::load(config.as_deref())?;
    println!("{}", serde_yaml::to_string(&settings.redacted())?);
    Ok(())
}
