//! Format selection, parsing, and rendering.

use std::path::Path;

use rstest::rstest;
use serde_json::{Value, json};

use super::FileFormat;
use crate::ConfigError;

#[rstest]
#[case("config.yaml", FileFormat::Yaml)]
#[case("config.yml", FileFormat::Yaml)]
#[case("CONFIG.YAML", FileFormat::Yaml)]
#[case("nested/dir/config.json", FileFormat::Json)]
fn selects_format_from_extension(#[case] path: &str, #[case] expected: FileFormat) {
    let format = FileFormat::from_path(Path::new(path)).expect("supported extension");
    assert_eq!(format, expected);
}

#[rstest]
#[case("config.xyz")]
#[case("config.toml")]
#[case("config")]
#[case(".yaml.bak")]
fn rejects_other_extensions(#[case] path: &str) {
    let err = FileFormat::from_path(Path::new(path)).expect_err("unsupported extension");
    assert!(matches!(err, ConfigError::Format { .. }), "unexpected error: {err}");
}

#[rstest]
fn yaml_yes_remains_a_string() {
    let map = FileFormat::Yaml
        .parse(Path::new("config.yaml"), "recipient: yes\nenabled: true\n")
        .expect("valid YAML");
    assert_eq!(map.get("recipient"), Some(&json!("yes")));
    assert_eq!(map.get("enabled"), Some(&json!(true)));
}

#[rstest]
fn yaml_nested_mappings_and_sequences() {
    let map = FileFormat::Yaml
        .parse(
            Path::new("config.yml"),
            "database:\n  host: localhost\n  port: 5432\nvoices: [alloy, echo]\nunset: null\n",
        )
        .expect("valid YAML");
    assert_eq!(
        Value::Object(map),
        json!({
            "database": {"host": "localhost", "port": 5432},
            "voices": ["alloy", "echo"],
            "unset": null,
        })
    );
}

#[rstest]
#[case(FileFormat::Yaml, "config.yaml", "recipient: [")]
#[case(FileFormat::Json, "config.json", "{\"recipient\": ")]
fn syntax_errors_name_the_file(
    #[case] format: FileFormat,
    #[case] path: &str,
    #[case] contents: &str,
) {
    let err = format
        .parse(Path::new(path), contents)
        .expect_err("malformed input");
    assert!(matches!(err, ConfigError::Parse { .. }), "unexpected error: {err}");
    assert!(err.to_string().contains(path));
}

#[rstest]
#[case(FileFormat::Json, "config.json", "[1, 2, 3]", "sequence")]
#[case(FileFormat::Json, "config.json", "\"just a string\"", "string")]
#[case(FileFormat::Yaml, "config.yaml", "- first\n- second\n", "sequence")]
#[case(FileFormat::Yaml, "config.yaml", "42\n", "number")]
fn top_level_must_be_a_mapping(
    #[case] format: FileFormat,
    #[case] path: &str,
    #[case] contents: &str,
    #[case] found: &str,
) {
    let err = format
        .parse(Path::new(path), contents)
        .expect_err("non-mapping document");
    let message = err.to_string();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(message.contains(found), "expected '{found}' in: {message}");
}

#[rstest]
fn json_renders_with_two_space_indent() {
    let data = json!({"app": {"name": "test-app"}});
    let Value::Object(map) = data else {
        panic!("expected object literal");
    };
    let rendered = FileFormat::Json
        .render(Path::new("out.json"), &map)
        .expect("render JSON");
    assert_eq!(rendered, "{\n  \"app\": {\n    \"name\": \"test-app\"\n  }\n}\n");
}

#[rstest]
fn yaml_renders_block_style() {
    let data = json!({"test": {"key": "value"}});
    let Value::Object(map) = data else {
        panic!("expected object literal");
    };
    let rendered = FileFormat::Yaml
        .render(Path::new("out.yaml"), &map)
        .expect("render YAML");
    assert_eq!(rendered, "test:\n  key: value\n");
}

#[rstest]
#[case("1_000")]
#[case("NaN")]
#[case("yes")]
#[case("1.0")]
#[case("~")]
#[case("0x1F")]
#[case(".inf")]
#[case("true")]
#[case("plain words")]
fn yaml_strings_read_back_as_strings(#[case] text: &str) {
    let data = json!({"value": text, "nested": {"items": [text]}, text: 1});
    let Value::Object(map) = data else {
        panic!("expected object literal");
    };
    let path = Path::new("out.yaml");
    let rendered = FileFormat::Yaml.render(path, &map).expect("render YAML");
    let reloaded = FileFormat::Yaml
        .parse(path, &rendered)
        .expect("rendered YAML parses");
    assert_eq!(reloaded, map, "rendered as:\n{rendered}");
}

#[rstest]
fn yaml_quotes_strings_the_parser_would_retype() {
    let data = json!({"limit": "1_000", "port": 5432});
    let Value::Object(map) = data else {
        panic!("expected object literal");
    };
    let rendered = FileFormat::Yaml
        .render(Path::new("out.yaml"), &map)
        .expect("render YAML");
    assert_eq!(rendered, "limit: \"1_000\"\nport: 5432\n");
}
