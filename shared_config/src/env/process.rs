//! Process environment with an optional `.env` side table.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::EnvLookup;
use crate::{ConfigError, ConfigResult};

/// Default `.env` location, relative to the working directory.
pub const DEFAULT_DOTENV_PATH: &str = ".env";

/// Reads the real process environment, falling back to variables loaded
/// from a `.env` file.
///
/// Variables already present in the process always win, so a `.env` file
/// can supply defaults but never clobber an exported value. The process
/// environment itself is left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnv {
    dotenv: HashMap<String, String>,
    dotenv_path: Option<PathBuf>,
}

impl ProcessEnv {
    /// Lookup backed by the process environment only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup that also consults `./.env`.
    ///
    /// # Errors
    ///
    /// See [`ProcessEnv::with_dotenv_file`].
    pub fn with_dotenv() -> ConfigResult<Self> {
        Self::with_dotenv_file(DEFAULT_DOTENV_PATH)
    }

    /// Lookup that also consults the `.env`-style file at `path`.
    ///
    /// A missing file is not an error; the side table is simply empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] when the file exists but cannot be
    /// read or contains a malformed line.
    pub fn with_dotenv_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(err) if err.not_found() => {
                tracing::debug!(path = %path.display(), "no .env file present");
                return Ok(Self::new());
            }
            Err(source) => return Err(dotenv_error(path, source)),
        };

        let mut dotenv = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|source| dotenv_error(path, source))?;
            dotenv.entry(key).or_insert(value);
        }
        tracing::debug!(
            path = %path.display(),
            count = dotenv.len(),
            "loaded environment variables from .env"
        );
        Ok(Self {
            dotenv,
            dotenv_path: Some(path.to_path_buf()),
        })
    }

    /// Path of the `.env` file that populated the side table, if one was found.
    #[must_use]
    pub fn dotenv_path(&self) -> Option<&Path> {
        self.dotenv_path.as_deref()
    }

    /// Value loaded from the `.env` file for `name`, ignoring the process
    /// environment.
    #[must_use]
    pub fn dotenv_var(&self, name: &str) -> Option<&str> {
        self.dotenv.get(name).map(String::as_str)
    }
}

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map_or_else(
            || self.dotenv.get(name).cloned(),
            |raw| Some(exported_value(name, raw)),
        )
    }
}

/// An exported value that is not valid UTF-8 still overrides; invalid
/// sequences become U+FFFD.
pub(super) fn exported_value(name: &str, raw: OsString) -> String {
    raw.into_string().unwrap_or_else(|raw| {
        tracing::debug!(name, "environment variable is not valid UTF-8; converting lossily");
        raw.to_string_lossy().into_owned()
    })
}

fn dotenv_error(path: &Path, source: dotenvy::Error) -> ConfigError {
    ConfigError::Dotenv {
        path: path.to_path_buf(),
        source,
    }
}
