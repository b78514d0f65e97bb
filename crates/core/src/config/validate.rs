use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Bot token is present (the only fatal startup requirement)
/// - Server port is not 0
/// - Runner timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.telegram.token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "telegram.token is not set (export CLIPSTITCH_TELEGRAM_TOKEN)".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.runner.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "runner.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
