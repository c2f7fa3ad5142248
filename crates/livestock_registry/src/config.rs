//! Registry limits and their loading from file and environment

use crate::errors::ConfigError;
use crate::types::{Principal, DEFAULT_BURN_PRINCIPAL};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable prefix, e.g. `LIVESTOCK_MAX_RECORDS=500`.
pub const ENV_PREFIX: &str = "LIVESTOCK";

/// Registry limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Total records the registry will ever accept
    pub max_records: u64,
    /// Hashes one owner may hold at a time
    pub max_records_per_owner: usize,
    pub max_breed_len: usize,
    pub max_description_len: usize,
    /// Principal treated as "no one"
    pub burn_principal: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_records: 10_000,
            max_records_per_owner: 100,
            max_breed_len: 50,
            max_description_len: 200,
            burn_principal: DEFAULT_BURN_PRINCIPAL.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Layer an optional TOML file and `LIVESTOCK_*` environment variables
    /// over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading registry configuration from: {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: RegistryConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits that would make the registry unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_records == 0 {
            return Err(ConfigError::Invalid("max_records must be positive".into()));
        }
        if self.max_records_per_owner == 0 {
            return Err(ConfigError::Invalid(
                "max_records_per_owner must be positive".into(),
            ));
        }
        if self.max_breed_len == 0 {
            return Err(ConfigError::Invalid("max_breed_len must be positive".into()));
        }
        if self.burn_principal.is_empty() {
            return Err(ConfigError::Invalid("burn_principal must not be empty".into()));
        }
        Ok(())
    }

    pub fn is_burn(&self, principal: &Principal) -> bool {
        principal.as_str() == self.burn_principal
    }
}
