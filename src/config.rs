use crate::database::config::DatabaseConfig;
use crate::server::config::{LoggingConfig, ServerConfig};
use config::builder::DefaultState;
use config::{Config as ConfigBuilder, ConfigBuilder as Builder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "SUBSCRIPTIONS";

/// Flat variables accepted for deployments configured the old way
/// (`APP_PORT=8080 DB_HOST=...`); they override every other source.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("APP_PORT", "server.port"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_SSLMODE", "database.sslmode"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults, then `config.yaml` if present, then environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        Self::finish(builder)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        Self::finish(builder)
    }

    fn defaults() -> Result<Builder<DefaultState>, ConfigError> {
        Ok(ConfigBuilder::builder().add_source(ConfigBuilder::try_from(&Config::default())?))
    }

    fn finish(builder: Builder<DefaultState>) -> Result<Self, ConfigError> {
        let mut builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        for (var, key) in LEGACY_ENV_KEYS {
            let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}
