//! Configuration loading and types for nbpost.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading and validating configs from files (`load`)

mod load;
mod types;

pub use load::DEFAULT_CONFIG_FILE;
pub use types::{ArticleMetadataConfig, Config, RemoveMagicConfig, TagRemoveConfig};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(std::path::PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    /// Check the values serde cannot: non-empty names and markers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export_format.trim().is_empty() {
            return Err(ConfigError::Validation(
                "'export_format' must not be empty".to_string(),
            ));
        }
        // An empty marker is contained in every string and would strip every code cell.
        if self.remove_magic.enabled && self.remove_magic.marker.is_empty() {
            return Err(ConfigError::Validation(
                "'remove_magic.marker' must not be empty".to_string(),
            ));
        }
        if self.article_metadata.enabled && self.article_metadata.key.is_empty() {
            return Err(ConfigError::Validation(
                "'article_metadata.key' must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_marker_rejected() {
        let mut config = Config::default();
        config.remove_magic.marker = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("remove_magic.marker"));

        config.remove_magic.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_metadata_key_rejected() {
        let mut config = Config::default();
        config.article_metadata.key = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}
