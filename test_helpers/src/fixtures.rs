//! Sample configuration documents used across test suites.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};

/// YAML document describing a database, a storage backend, and an API.
pub const SAMPLE_YAML: &str = "\
database:
  host: localhost
  port: 5432
  name: test_db

storage:
  backend: local
  base_path: ./data

api:
  key: test-api-key
  endpoint: https://api.example.com
";

/// JSON document describing an application and its feature switches.
pub const SAMPLE_JSON: &str = r#"{
  "app": {
    "name": "test-app",
    "version": "1.0.0"
  },
  "features": {
    "enable_cache": true,
    "max_workers": 4
  }
}
"#;

/// Converts a directory path into a UTF-8 path.
///
/// # Errors
///
/// Returns an error when `dir` is not valid UTF-8.
pub fn utf8_dir(dir: &std::path::Path) -> Result<&Utf8Path> {
    Utf8Path::from_path(dir).ok_or_else(|| anyhow!("path is not UTF-8: {}", dir.display()))
}

/// Writes `contents` to `dir/name` and returns the full path.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn write_file(dir: &Utf8Path, name: &str, contents: &str) -> Result<Utf8PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("write fixture {path}"))?;
    Ok(path)
}

/// Writes [`SAMPLE_YAML`] to `dir/config.yaml`.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn sample_yaml(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    write_file(dir, "config.yaml", SAMPLE_YAML)
}

/// Writes [`SAMPLE_JSON`] to `dir/config.json`.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn sample_json(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    write_file(dir, "config.json", SAMPLE_JSON)
}
