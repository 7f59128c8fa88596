//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.workers == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.workers must be > 0".into(),
            ));
        }
        if self.resize.target_widths.is_empty() {
            return Err(ConfigError::ValidationError(
                "resize.target_widths must not be empty".into(),
            ));
        }
        if self.resize.target_widths.iter().any(|&w| w == 0) {
            return Err(ConfigError::ValidationError(
                "resize.target_widths entries must be > 0".into(),
            ));
        }
        if self.general.home_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "general.home_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_fetch_workers() {
        let mut config = Config::default();
        config.fetch.workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fetch.workers"));
    }

    #[test]
    fn test_validate_rejects_empty_widths() {
        let mut config = Config::default();
        config.resize.target_widths.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("target_widths"));
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let mut config = Config::default();
        config.resize.target_widths = vec![32, 0, 200];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("target_widths"));
    }

    #[test]
    fn test_validate_allows_auto_resize_workers() {
        let mut config = Config::default();
        config.resize.workers = 0;
        assert!(config.validate().is_ok());
    }
}
