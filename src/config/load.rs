//! Configuration loading from files.
//!
//! This module handles reading, layering, and validating configuration.

use std::path::Path;

use super::{Config, ConfigError};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "nbpost.yaml";

/// Prefix of environment variables that override top-level settings
/// (e.g. `NBPOST_EXPORT_FORMAT=notebook`).
const ENV_PREFIX: &str = "NBPOST";

impl Config {
    /// Load the config from the command line argument.
    ///
    /// An explicitly given file must exist. Without one, `nbpost.yaml` in the
    /// working directory is used when present, and defaults otherwise.
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let required = config_file.is_some();
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file, required)
    }

    /// Load the config from a file path, layering environment overrides on top.
    pub(crate) fn load_from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        let config = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml).required(required))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize::<Config>()?;

        config.validate()?;

        tracing::debug!(path = %path.display(), format = %config.export_format, "loaded config");
        Ok(config)
    }
}
