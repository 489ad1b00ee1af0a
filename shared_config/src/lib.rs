//! Layered configuration for media automation pipelines.
//!
//! [`ConfigStore`] loads a YAML or JSON file into a nested mapping, answers
//! dotted-key lookups such as `database.host`, and lets an exported
//! `DATABASE_HOST` variable take precedence over the file. Values can be
//! set, deep-merged from further mappings or files, extracted into typed
//! structs, and saved back to disk.
//!
//! ```rust,no_run
//! use shared_config::ConfigStore;
//!
//! # fn run() -> shared_config::ConfigResult<()> {
//! let mut store = ConfigStore::open("config.yaml")?;
//! store.merge_file("config.local.yaml")?;
//! store.set("storage.backend", "local")?;
//! let port = store.get_or("database.port", 5432);
//! store.save("config.resolved.json")?;
//! # let _ = port;
//! # Ok(())
//! # }
//! ```

mod env;
mod error;
mod format;
mod key;
mod merge;
mod provider;
mod store;

pub use env::{DEFAULT_DOTENV_PATH, EnvLookup, NoEnv, ProcessEnv};
pub use error::{ConfigError, ConfigResult};
pub use format::FileFormat;
pub use key::{KeyPath, normalize_prefix};
pub use merge::{merge_map, merge_value};
pub use store::{ConfigStore, ConfigStoreBuilder};

pub(crate) use merge::value_kind;
