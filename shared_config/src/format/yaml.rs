//! YAML rendering that reads back unchanged through the strict parser.
//!
//! `serde_yaml` decides whether to quote a string with YAML 1.1 rules, but
//! files are read back with serde-saphyr. A few plain scalars such as
//! `1_000` or `NaN` resolve differently between the two, so any string that
//! would not come back as the same string is emitted double-quoted.

use std::path::Path;

use serde_json::{Map, Value};

use super::parse_yaml;
use crate::{ConfigError, ConfigResult};

const MARKER: &str = "__shared_config_quoted_";

/// Render `data` as block-style YAML that `parse_yaml` reads back as `data`.
pub(super) fn render(path: &Path, data: &Map<String, Value>) -> ConfigResult<String> {
    let plain = to_yaml(path, data)?;
    if reads_back(&plain, data) {
        return Ok(plain);
    }

    let mut marker = String::from(MARKER);
    while plain.contains(&marker) {
        marker.push('_');
    }
    let mut quoted = Vec::new();
    let masked = mask_map(data, &marker, &mut quoted);
    let mut rendered = to_yaml(path, &masked)?;
    for (index, original) in quoted.iter().enumerate() {
        let literal =
            serde_json::to_string(original).map_err(|e| ConfigError::serialize(path, e))?;
        rendered = rendered.replace(&token(&marker, index), &literal);
    }
    tracing::debug!(
        path = %path.display(),
        quoted = quoted.len(),
        "quoted YAML strings that would not read back as strings"
    );
    Ok(rendered)
}

fn to_yaml(path: &Path, data: &Map<String, Value>) -> ConfigResult<String> {
    serde_yaml::to_string(data).map_err(|e| ConfigError::serialize(path, e))
}

fn reads_back(text: &str, data: &Map<String, Value>) -> bool {
    matches!(parse_yaml(text), Ok(Value::Object(ref parsed)) if parsed == data)
}

/// Whether `text` survives a render and reload both as a key and as a value.
fn survives_reload(text: &str) -> bool {
    let mut sample = Map::new();
    sample.insert(text.to_owned(), Value::String(text.to_owned()));
    serde_yaml::to_string(&sample).is_ok_and(|rendered| reads_back(&rendered, &sample))
}

fn token(marker: &str, index: usize) -> String {
    format!("{marker}{index}{marker}")
}

/// Replace strings that need quoting with plain placeholder tokens.
///
/// The originals are pushed onto `quoted` in token order.
fn mask_map(
    data: &Map<String, Value>,
    marker: &str,
    quoted: &mut Vec<String>,
) -> Map<String, Value> {
    data.iter()
        .map(|(key, value)| (mask_str(key, marker, quoted), mask_value(value, marker, quoted)))
        .collect()
}

fn mask_value(value: &Value, marker: &str, quoted: &mut Vec<String>) -> Value {
    match value {
        Value::String(text) => Value::String(mask_str(text, marker, quoted)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| mask_value(item, marker, quoted))
                .collect(),
        ),
        Value::Object(map) => Value::Object(mask_map(map, marker, quoted)),
        other => other.clone(),
    }
}

fn mask_str(text: &str, marker: &str, quoted: &mut Vec<String>) -> String {
    if survives_reload(text) {
        return text.to_owned();
    }
    let placeholder = token(marker, quoted.len());
    quoted.push(text.to_owned());
    placeholder
}
