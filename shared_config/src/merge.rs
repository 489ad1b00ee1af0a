//! Right-biased deep merge of JSON-like configuration values.

use serde_json::{Map, Value};

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When both sides are mappings, keys are merged recursively: existing
///   siblings survive and nested mappings are overlaid.
/// - Otherwise the incoming value replaces `target` wholesale. This covers
///   a scalar replacing a mapping, a mapping replacing a scalar, and
///   sequences, which are never concatenated.
///
/// # Examples
///
/// ```rust
/// use shared_config::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// merge_value(&mut acc, json!({"b": [1, 2, 3]}));
/// assert_eq!(acc["b"], json!([1, 2, 3]));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match (target, layer) {
        (Value::Object(existing), Value::Object(incoming)) => merge_map(existing, incoming),
        (slot, incoming) => *slot = incoming,
    }
}

/// Merge the mapping `layer` into `target` key by key.
///
/// See [`merge_value`] for the rules applied at each key.
pub fn merge_map(target: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Human-readable name of a value's kind, used in error messages.
pub(crate) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
