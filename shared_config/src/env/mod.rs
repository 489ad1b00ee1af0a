//! Environment lookups consulted before stored configuration.
//!
//! [`ConfigStore`](crate::ConfigStore) never reads the process environment
//! directly. It asks an [`EnvLookup`], which lets tests and embedding
//! applications supply a fixed map instead of mutating global state.

mod process;

pub use process::{DEFAULT_DOTENV_PATH, ProcessEnv};

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Source of environment-variable overrides.
pub trait EnvLookup {
    /// Return the raw value of `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Lookup that never yields a value, disabling environment overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoEnv;

impl EnvLookup for NoEnv {
    fn var(&self, _name: &str) -> Option<String> {
        None
    }
}

impl<S: BuildHasher> EnvLookup for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: EnvLookup + ?Sized> EnvLookup for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}
