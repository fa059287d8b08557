//! Pure parse/validate for facade configuration (`fsgate.toml`).

use crate::domain::AppError;

use super::FilesystemConfig;

/// Parse and validate configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<FilesystemConfig, AppError> {
    let config: FilesystemConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
