use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Bot token is present (the telegram section itself is enforced by serde)
/// - Timeouts and dimensions are non-zero
/// - At least one static output format is configured
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.telegram.bot_token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "telegram.bot_token must be set".to_string(),
        ));
    }

    if config.telegram.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "telegram.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.processor.max_dimension == 0 {
        return Err(ConfigError::ValidationError(
            "processor.max_dimension cannot be 0".to_string(),
        ));
    }

    if config.processor.static_formats.is_empty() {
        return Err(ConfigError::ValidationError(
            "processor.static_formats cannot be empty".to_string(),
        ));
    }

    if config.transcoder.target_size == 0 {
        return Err(ConfigError::ValidationError(
            "transcoder.target_size cannot be 0".to_string(),
        ));
    }

    if config.transcoder.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "transcoder.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[telegram]
bot_token = "123:abc"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_blank_token_fails() {
        let mut config = valid_config();
        config.telegram.bot_token = "   ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_dimension_fails() {
        let mut config = valid_config();
        config.processor.max_dimension = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_formats_fails() {
        let mut config = valid_config();
        config.processor.static_formats.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_transcoder_timeout_fails() {
        let mut config = valid_config();
        config.transcoder.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
