//! Dotted key paths such as `database.host`.
//!
//! A key path addresses a value inside nested mappings, one segment per
//! level. There is no escaping, so a mapping key containing a literal `.`
//! cannot be addressed.

use crate::{ConfigError, ConfigResult};

const SEPARATOR: char = '.';

/// A validated dotted key path borrowing from the caller's string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    raw: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> KeyPath<'a> {
    /// Parse `raw` into its segments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] when `raw` is empty or contains an
    /// empty segment (`"a..b"`, `".a"`, `"a."`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shared_config::KeyPath;
    ///
    /// let key = KeyPath::parse("database.host")?;
    /// assert_eq!(key.segments(), ["database", "host"]);
    /// assert!(KeyPath::parse("database..host").is_err());
    /// # Ok::<_, shared_config::ConfigError>(())
    /// ```
    pub fn parse(raw: &'a str) -> ConfigResult<Self> {
        if raw.is_empty() {
            return Err(invalid(raw, "key path is empty"));
        }
        let segments: Vec<&str> = raw.split(SEPARATOR).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid(raw, "key path contains an empty segment"));
        }
        Ok(Self { raw, segments })
    }

    /// The key path exactly as supplied.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.raw
    }

    /// The individual mapping keys, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Split into the parent segments and the final segment.
    pub(crate) fn split_last(&self) -> (&[&'a str], &'a str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, *last),
            // `parse` rejects empty input, so there is always a last segment.
            None => (&[], self.raw),
        }
    }

    /// The dotted path made of the first `depth` segments.
    pub(crate) fn prefix(&self, depth: usize) -> String {
        self.segments
            .iter()
            .take(depth)
            .copied()
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Environment variable consulted for this key.
    ///
    /// The key is upper-cased and every `.` becomes `_`. When `prefix` is
    /// supplied it is upper-cased, stripped of trailing underscores, and
    /// joined with a single `_`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shared_config::KeyPath;
    ///
    /// let key = KeyPath::parse("database.host")?;
    /// assert_eq!(key.env_var_name(None), "DATABASE_HOST");
    /// assert_eq!(key.env_var_name(Some("app_")), "APP_DATABASE_HOST");
    /// # Ok::<_, shared_config::ConfigError>(())
    /// ```
    #[must_use]
    pub fn env_var_name(&self, prefix: Option<&str>) -> String {
        let name = self.raw.to_uppercase().replace(SEPARATOR, "_");
        match prefix.map(normalize_prefix).filter(|p| !p.is_empty()) {
            Some(p) => format!("{p}_{name}"),
            None => name,
        }
    }
}

/// Normalise an environment prefix by trimming trailing underscores and
/// converting to upper case.
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_end_matches('_').to_uppercase()
}

fn invalid(raw: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidKey {
        key: raw.to_owned(),
        reason,
    }
}
