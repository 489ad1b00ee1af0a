//! The layered configuration store.
//!
//! A [`ConfigStore`] owns a nested mapping loaded from YAML or JSON and
//! answers dotted-key lookups, consulting an [`EnvLookup`] first so that
//! exported variables override file values.

mod builder;

pub use builder::ConfigStoreBuilder;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::env::{EnvLookup, ProcessEnv};
use crate::format::FileFormat;
use crate::key::KeyPath;
use crate::merge::{merge_map, value_kind};
use crate::{ConfigError, ConfigResult};

/// Nested configuration with environment overrides.
///
/// # Examples
///
/// ```rust
/// use shared_config::{ConfigStore, NoEnv};
/// use serde_json::json;
///
/// let mut store = ConfigStore::with_env(NoEnv);
/// store.set("database.host", "localhost")?;
/// store.merge_value(json!({"database": {"port": 5432}}))?;
///
/// assert_eq!(store.get("database.host"), Some(json!("localhost")));
/// assert_eq!(store.get_or("database.user", "postgres"), json!("postgres"));
/// # Ok::<_, shared_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigStore<E = ProcessEnv> {
    data: Map<String, Value>,
    env: E,
    env_prefix: Option<String>,
    source: Option<PathBuf>,
}

impl ConfigStore<ProcessEnv> {
    /// Empty store that reads overrides from the process environment.
    ///
    /// No `.env` file is loaded; use [`ConfigStore::builder`] for that.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring a store.
    #[must_use]
    pub fn builder() -> ConfigStoreBuilder {
        ConfigStoreBuilder::new()
    }

    /// Load `path` into a store backed by the process environment and `./.env`.
    ///
    /// # Errors
    ///
    /// Propagates any failure from [`ConfigStoreBuilder::build`].
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::builder().file(path).build()
    }
}

impl<E: EnvLookup> ConfigStore<E> {
    /// Empty store reading overrides from `env`.
    #[must_use]
    pub fn with_env(env: E) -> Self {
        Self {
            data: Map::new(),
            env,
            env_prefix: None,
            source: None,
        }
    }

    /// Replace the environment prefix used to derive variable names.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Replace the stored data with the contents of `path`.
    ///
    /// The format is chosen from the extension before the file is opened.
    /// On failure the existing data is left untouched.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Format`] for an unsupported extension.
    /// - [`ConfigError::NotFound`] when `path` does not exist.
    /// - [`ConfigError::Read`] for other I/O failures.
    /// - [`ConfigError::Parse`] for malformed content or a non-mapping
    ///   top level.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        self.data = read_file(path)?;
        self.source = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(())
    }

    /// Deep-merge the contents of `path` over the stored data.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`ConfigStore::load`].
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let layer = read_file(path)?;
        merge_map(&mut self.data, layer);
        tracing::info!(path = %path.display(), "merged configuration file");
        Ok(())
    }

    /// Look up `key`, preferring the environment over stored data.
    ///
    /// The environment variable is the key upper-cased with `.` replaced by
    /// `_` (and the prefix prepended, if one is set). Its raw string is
    /// returned without coercion. Stored values are returned only when the
    /// full path exists and is not null, so an absent key and an explicit
    /// null are indistinguishable here; see [`ConfigStore::contains`].
    ///
    /// Invalid key paths (empty, or with an empty segment such as `a..b`)
    /// yield `None` without consulting the environment, so no variable like
    /// `A__B` is ever looked up for them.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let path = KeyPath::parse(key).ok()?;
        let name = path.env_var_name(self.env_prefix.as_deref());
        if let Some(raw) = self.env.var(&name) {
            return Some(Value::String(raw));
        }
        lookup(&self.data, &path).cloned()
    }

    /// Like [`ConfigStore::get`] but falls back to `default`.
    #[must_use]
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Look up `key` in the stored data only, ignoring the environment.
    ///
    /// Absent paths, explicit nulls, and invalid key paths all yield `None`.
    #[must_use]
    pub fn get_stored(&self, key: &str) -> Option<&Value> {
        let path = KeyPath::parse(key).ok()?;
        lookup(&self.data, &path)
    }

    /// Whether the stored data contains `key`, even when it holds null.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        KeyPath::parse(key).is_ok_and(|path| walk(&self.data, &path).is_some())
    }

    /// Assign `value` at `key`, creating intermediate mappings as needed.
    ///
    /// An intermediate explicit null is treated like a missing segment and
    /// replaced by a mapping.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidKey`] when `key` is empty or has an empty
    ///   segment.
    /// - [`ConfigError::Type`] when an intermediate segment holds a
    ///   non-mapping value; the error names that segment's path.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> ConfigResult<()> {
        let path = KeyPath::parse(key)?;
        let (parents, last) = path.split_last();
        let mut node = &mut self.data;
        for (depth, segment) in parents.iter().enumerate() {
            let slot = node
                .entry((*segment).to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }
            node = match slot {
                Value::Object(map) => map,
                other => {
                    return Err(ConfigError::Type {
                        path: path.prefix(depth + 1),
                        found: value_kind(other),
                    });
                }
            };
        }
        node.insert(last.to_owned(), value.into());
        tracing::debug!(key, "set configuration value");
        Ok(())
    }

    /// Remove and return the value at `key`.
    ///
    /// Returns `None` when the path is absent or invalid.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let path = KeyPath::parse(key).ok()?;
        let (parents, last) = path.split_last();
        let mut node = &mut self.data;
        for segment in parents {
            node = node.get_mut(*segment)?.as_object_mut()?;
        }
        let removed = node.remove(last);
        if removed.is_some() {
            tracing::debug!(key, "removed configuration value");
        }
        removed
    }

    /// Deep-merge `update` into the stored data.
    ///
    /// Mappings present on both sides merge recursively; any other incoming
    /// value replaces the existing one, sequences included.
    pub fn merge(&mut self, update: Map<String, Value>) {
        merge_map(&mut self.data, update);
        tracing::info!("merged additional configuration");
    }

    /// Deep-merge an arbitrary value, which must be a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Type`] when `update` is not a mapping.
    pub fn merge_value(&mut self, update: Value) -> ConfigResult<()> {
        match update {
            Value::Object(map) => {
                self.merge(map);
                Ok(())
            }
            other => Err(ConfigError::Type {
                path: String::from("<root>"),
                found: value_kind(&other),
            }),
        }
    }

    /// Write the stored data to `path` in the format named by its extension.
    ///
    /// The content is written to a temporary file in the destination
    /// directory and renamed over `path`, so readers never observe a
    /// partially written file. An existing file keeps its permissions; a
    /// new one is created with mode `0644` on Unix.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Format`] for an unsupported extension.
    /// - [`ConfigError::Serialize`] if rendering fails.
    /// - [`ConfigError::Write`] if the file cannot be written or renamed.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let rendered = format.render(path, &self.data)?;
        write_atomic(path, rendered.as_bytes())?;
        tracing::info!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Deserialise the stored data into `T`, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Extract`] if the data does not fit `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> ConfigResult<T> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }

    /// Deserialise the stored subtree at `key` into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent, null, or invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Extract`] if the value does not fit `T`.
    pub fn extract_at<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        self.get_stored(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(ConfigError::from)
    }

    /// Deep copy of the stored data.
    ///
    /// Mutating the returned mapping never affects the store.
    #[must_use]
    pub fn to_mapping(&self) -> Map<String, Value> {
        self.data.clone()
    }

    /// Borrow the stored data.
    #[must_use]
    pub const fn as_mapping(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Consume the store, returning its data.
    #[must_use]
    pub fn into_mapping(self) -> Map<String, Value> {
        self.data
    }

    /// Whether no top-level keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Path most recently passed to [`ConfigStore::load`].
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The environment lookup consulted by [`ConfigStore::get`].
    #[must_use]
    pub const fn env(&self) -> &E {
        &self.env
    }
}

/// Follow `path` through nested mappings, returning the value even if null.
fn walk<'a>(data: &'a Map<String, Value>, path: &KeyPath<'_>) -> Option<&'a Value> {
    let (parents, last) = path.split_last();
    let mut node = data;
    for segment in parents {
        node = node.get(*segment)?.as_object()?;
    }
    node.get(last)
}

/// Follow `path`, treating an explicit null like an absent key.
fn lookup<'a>(data: &'a Map<String, Value>, path: &KeyPath<'_>) -> Option<&'a Value> {
    walk(data, path).filter(|value| !value.is_null())
}

fn read_file(path: &Path) -> ConfigResult<Map<String, Value>> {
    let format = FileFormat::from_path(path)?;
    let data = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    format.parse(path, &data)
}

#[cfg(unix)]
const DEFAULT_FILE_MODE: u32 = 0o644;

fn write_atomic(path: &Path, contents: &[u8]) -> ConfigResult<()> {
    let write_error = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(contents).map_err(write_error)?;
    match_permissions(tmp.as_file(), path).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(path).map_err(|err| write_error(err.error))?;
    Ok(())
}

/// Give the temporary `file` the permissions of `target`, or the default
/// mode when `target` does not exist yet.
fn match_permissions(file: &std::fs::File, target: &Path) -> std::io::Result<()> {
    match std::fs::metadata(target) {
        Ok(existing) => file.set_permissions(existing.permissions()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => apply_default_mode(file),
        Err(err) => Err(err),
    }
}

/// Temporary files are created owner-only; a newly saved file gets the
/// usual world-readable mode instead.
#[cfg(unix)]
fn apply_default_mode(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    file.set_permissions(std::fs::Permissions::from_mode(DEFAULT_FILE_MODE))
}

#[cfg(not(unix))]
const fn apply_default_mode(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
