//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use userbase_core::UserbaseError;

/// Environment variable naming the active environment.
pub const ENVIRONMENT_VAR: &str = "USERBASE_ENVIRONMENT";

/// Prefix of the `USERBASE__SECTION__KEY` override variables.
pub const ENV_PREFIX: &str = "USERBASE";

/// Layered configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: String,
}

impl ConfigLoader {
    /// Creates a loader for `config_dir`.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{dir}/default.toml` - Default values
    /// 2. `{dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{dir}/local.toml` - Local overrides, not committed
    /// 4. Environment variables such as `USERBASE__SERVER__REST_PORT`
    ///
    /// The environment comes from `USERBASE_ENVIRONMENT` and defaults to
    /// `development`. A `.env` file, if present, is read first.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }
        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        Self::with_environment(config_dir, environment)
    }

    /// Creates a loader for an explicit environment name.
    pub fn with_environment(config_dir: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            environment: environment.into(),
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Reads and validates the configuration.
    pub fn load(&self) -> Result<AppConfig, UserbaseError> {
        Self::load_config(&self.config_dir, &self.environment)
    }

    fn load_config(config_dir: &Path, environment: &str) -> Result<AppConfig, UserbaseError> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = config_dir.join(format!("{}.toml", name));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error_to_userbase_error)?;

        if app_config.app.environment != environment {
            app_config.app.environment = environment.to_string();
        }

        ConfigValidator::validate(&app_config)
            .map_err(|errors| UserbaseError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

fn config_error_to_userbase_error(err: ConfigError) -> UserbaseError {
    UserbaseError::Configuration(err.to_string())
}
