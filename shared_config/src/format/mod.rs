//! File formats recognised by the store, selected by extension.

use std::path::Path;

use serde_json::{Map, Value};
use serde_saphyr::Options;

use crate::{ConfigError, ConfigResult, value_kind};

mod yaml;

/// Serialisation format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML 1.2, from a `.yaml` or `.yml` extension.
    Yaml,
    /// JSON, from a `.json` extension.
    Json,
}

impl FileFormat {
    /// Select the format from the extension of `path`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Format`] for any other extension, including a
    /// missing one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shared_config::FileFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(FileFormat::from_path(Path::new("app.YML"))?, FileFormat::Yaml);
    /// assert!(FileFormat::from_path(Path::new("app.toml")).is_err());
    /// # Ok::<_, shared_config::ConfigError>(())
    /// ```
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::Format {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse `data` read from `path`, requiring a mapping at the top level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when `data` is not valid in this format
    /// or its top-level value is not a mapping.
    pub fn parse(self, path: &Path, data: &str) -> ConfigResult<Map<String, Value>> {
        let value = match self {
            // serde-saphyr errors are stringified; the message already carries
            // the line and column.
            Self::Yaml => parse_yaml(data).map_err(|e| ConfigError::parse(path, e.to_string()))?,
            Self::Json => {
                serde_json::from_str::<Value>(data).map_err(|e| ConfigError::parse(path, e))?
            }
        };
        match value {
            Value::Object(map) => Ok(map),
            other => Err(ConfigError::parse(
                path,
                format!(
                    "top-level value must be a mapping, found {}",
                    value_kind(&other)
                ),
            )),
        }
    }

    /// Render `data` in this format for writing to `path`.
    ///
    /// JSON is pretty-printed with two-space indentation; YAML uses block
    /// style, double-quoting any string that would otherwise be read back as
    /// a different value (`1_000`, `NaN`). Both end with a newline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if the serialiser rejects the data.
    pub fn render(self, path: &Path, data: &Map<String, Value>) -> ConfigResult<String> {
        match self {
            Self::Yaml => yaml::render(path, data),
            Self::Json => serde_json::to_string_pretty(data)
                .map(|mut rendered| {
                    rendered.push('\n');
                    rendered
                })
                .map_err(|e| ConfigError::serialize(path, e)),
        }
    }
}

/// Parse YAML with strict boolean semantics so `yes`/`no` stay strings.
fn parse_yaml(data: &str) -> Result<Value, serde_saphyr::Error> {
    serde_saphyr::from_str_with_options(
        data,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
}

#[cfg(test)]
mod tests;
