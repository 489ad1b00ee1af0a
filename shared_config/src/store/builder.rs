//! Builder for [`ConfigStore`].
//!
//! The builder collects the optional configuration file, the `.env`
//! behaviour, and the environment prefix before producing a store.

use std::path::PathBuf;

use super::ConfigStore;
use crate::ConfigResult;
use crate::env::{DEFAULT_DOTENV_PATH, EnvLookup, ProcessEnv};

/// Builder for [`ConfigStore`].
///
/// # Examples
///
/// ```rust,no_run
/// use shared_config::ConfigStore;
///
/// # fn run() -> shared_config::ConfigResult<()> {
/// let store = ConfigStore::builder()
///     .file("config/pipeline.yaml")
///     .env_prefix("REEL")
///     .build()?;
///
/// if let Some(host) = store.get("database.host") {
///     println!("connecting to {host}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStoreBuilder {
    file: Option<PathBuf>,
    load_dotenv: bool,
    dotenv_path: PathBuf,
    env_prefix: Option<String>,
}

impl Default for ConfigStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStoreBuilder {
    /// Builder with no file, `.env` loading enabled, and no prefix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            load_dotenv: true,
            dotenv_path: PathBuf::from(DEFAULT_DOTENV_PATH),
            env_prefix: None,
        }
    }

    /// Configuration file loaded when the store is built.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Whether [`ConfigStoreBuilder::build`] reads a `.env` file.
    #[must_use]
    pub fn load_dotenv(mut self, enabled: bool) -> Self {
        self.load_dotenv = enabled;
        self
    }

    /// Location of the `.env` file, `./.env` by default.
    #[must_use]
    pub fn dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = path.into();
        self
    }

    /// Prefix prepended to derived environment-variable names.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Build a store backed by the process environment.
    ///
    /// The `.env` file is read first, so a malformed `.env` is reported even
    /// when the configuration file would also fail.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Dotenv`] for an unreadable `.env` file
    /// and any error from [`ConfigStore::load`] for the configuration file.
    pub fn build(self) -> ConfigResult<ConfigStore<ProcessEnv>> {
        let env = if self.load_dotenv {
            ProcessEnv::with_dotenv_file(&self.dotenv_path)?
        } else {
            ProcessEnv::new()
        };
        self.build_with_env(env)
    }

    /// Build a store that reads overrides from `env`.
    ///
    /// The `.env` settings are ignored because `env` replaces the process
    /// environment entirely.
    ///
    /// # Errors
    ///
    /// Returns any error from [`ConfigStore::load`] for the configuration
    /// file.
    pub fn build_with_env<E: EnvLookup>(self, env: E) -> ConfigResult<ConfigStore<E>> {
        let mut store = ConfigStore::with_env(env);
        store.env_prefix = self.env_prefix;
        if let Some(path) = self.file {
            store.load(path)?;
        }
        Ok(store)
    }
}
