//! # rme-config
//!
//! Layered configuration loading for RedditMirrorEdit using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RME_*` prefix, `__` as separator)
//! 2. The raw `CLIENT_ID` / `CLIENT_SECRET` variables (mapped into `reddit.*`)
//! 3. Project-level `./rme.toml`
//! 4. User-level `~/.config/rme/config.toml`
//! 5. Built-in defaults
//!
//! Command-line flags are applied on top by the `rme` binary.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RME_JOB__MAP_SAVE_INTERVAL` -> `job.map_save_interval`,
//! `RME_REDDIT__REDIRECT_URI` -> `reddit.redirect_uri`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use rme_config::RmeConfig;
//!
//! let config = RmeConfig::load_with_dotenv().expect("config");
//! config.reddit.require_credentials().expect("credentials");
//! println!("jobs go to {}", config.job.jobs_dir);
//! ```

mod error;
mod job;
mod reddit;

pub use error::ConfigError;
pub use job::JobConfig;
pub use reddit::{CREDENTIAL_VARS, RedditConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LOCAL_CONFIG_FILE: &str = "rme.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RmeConfig {
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub job: JobConfig,
}

impl RmeConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` on malformed sources and
    /// `ConfigError::InvalidValue` when a value is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// A missing `.env` file is not an error.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer more providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&CREDENTIAL_VARS)
                    .map(|key| format!("reddit.{}", key.as_str().to_ascii_lowercase()).into()),
            )
            .merge(Env::prefixed("RME_").split("__"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.job.jobs_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "job.jobs_dir".into(),
                reason: "must not be empty".into(),
            });
        }
        self.reddit.callback_address()?;
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rme").join("config.toml"))
    }
}
