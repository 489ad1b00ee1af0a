//! Loading, layering, and saving configuration files.
//!
//! Each test works in its own temporary directory so the suites can run in
//! parallel.

use anyhow::{Context, Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use shared_config::{ConfigError, ConfigStore, NoEnv};
use tempfile::TempDir;
use test_helpers::fixtures::{sample_json, sample_yaml, utf8_dir, write_file};

#[fixture]
fn workdir() -> TempDir {
    tempfile::tempdir().expect("create temporary directory")
}

fn empty_store() -> ConfigStore<NoEnv> {
    ConfigStore::with_env(NoEnv)
}

fn sample_document() -> Value {
    json!({
        "database": {"host": "localhost", "port": 5432, "replicas": ["a", "b"]},
        "api_key": "test-key",
        "features": {"enable_cache": true, "ratio": 0.5, "unset": null},
        "recipient": "yes",
        "limits": {"batch": "1_000", "fallback": "NaN", "1_000": "key"},
    })
}

#[rstest]
fn loads_yaml_fixture(workdir: TempDir) -> Result<()> {
    let path = sample_yaml(utf8_dir(workdir.path())?)?;
    let mut store = empty_store();
    store.load(&path)?;

    ensure!(store.get("database.host") == Some(json!("localhost")));
    ensure!(store.get("database.port") == Some(json!(5432)));
    ensure!(store.get("api.key") == Some(json!("test-api-key")));
    ensure!(store.get("storage.base_path") == Some(json!("./data")));
    ensure!(store.source_path() == Some(path.as_std_path()));
    Ok(())
}

#[rstest]
fn loads_json_fixture(workdir: TempDir) -> Result<()> {
    let path = sample_json(utf8_dir(workdir.path())?)?;
    let mut store = empty_store();
    store.load(&path)?;

    ensure!(store.get("app.name") == Some(json!("test-app")));
    ensure!(store.get("app.version") == Some(json!("1.0.0")));
    ensure!(store.get("features.enable_cache") == Some(json!(true)));
    ensure!(store.get("features.max_workers") == Some(json!(4)));
    Ok(())
}

#[rstest]
#[case("settings.yaml")]
#[case("settings.yml")]
#[case("settings.json")]
fn save_then_load_reconstructs_the_mapping(workdir: TempDir, #[case] name: &str) -> Result<()> {
    let mut original = empty_store();
    original.merge_value(sample_document())?;
    let path = workdir.path().join(name);
    original.save(&path)?;

    let mut reloaded = empty_store();
    reloaded.load(&path)?;
    ensure!(
        Value::Object(reloaded.to_mapping()) == sample_document(),
        "round trip through {name} changed the data: {:?}",
        reloaded.as_mapping()
    );
    Ok(())
}

#[rstest]
fn save_overwrites_existing_file(workdir: TempDir) -> Result<()> {
    let dir = utf8_dir(workdir.path())?;
    let path = write_file(dir, "output.yaml", "stale: true\n")?;

    let mut store = empty_store();
    store.set("test.key", "value")?;
    store.save(&path)?;

    let reloaded = ConfigStore::builder()
        .file(path.as_std_path())
        .load_dotenv(false)
        .build_with_env(NoEnv)?;
    ensure!(reloaded.get("test.key") == Some(json!("value")));
    ensure!(!reloaded.contains("stale"));

    let leftovers = std::fs::read_dir(dir)
        .context("list output directory")?
        .count();
    ensure!(leftovers == 1, "temporary file left behind");
    Ok(())
}

#[rstest]
fn save_to_missing_directory_fails(workdir: TempDir) -> Result<()> {
    let store = empty_store();
    let path = workdir.path().join("missing").join("out.json");
    let err = store
        .save(&path)
        .err()
        .ok_or_else(|| anyhow!("expected save into a missing directory to fail"))?;
    ensure!(matches!(err, ConfigError::Write { .. }), "unexpected error: {err}");
    Ok(())
}

#[rstest]
fn merge_file_layers_over_base(workdir: TempDir) -> Result<()> {
    let dir = utf8_dir(workdir.path())?;
    let base = sample_yaml(dir)?;
    let local = write_file(
        dir,
        "config.local.json",
        r#"{"database": {"host": "db.internal"}, "storage": {"backend": "s3"}}"#,
    )?;

    let mut store = empty_store();
    store.load(&base)?;
    store.merge_file(&local)?;

    ensure!(store.get("database.host") == Some(json!("db.internal")));
    ensure!(store.get("database.port") == Some(json!(5432)));
    ensure!(store.get("storage.backend") == Some(json!("s3")));
    ensure!(store.get("storage.base_path") == Some(json!("./data")));
    ensure!(store.source_path() == Some(base.as_std_path()));
    Ok(())
}

#[rstest]
fn load_replaces_rather_than_merges(workdir: TempDir) -> Result<()> {
    let dir = utf8_dir(workdir.path())?;
    let first = write_file(dir, "first.yaml", "only_in_first: 1\nshared: first\n")?;
    let second = write_file(dir, "second.yaml", "shared: second\n")?;

    let mut store = empty_store();
    store.load(&first)?;
    store.load(&second)?;
    ensure!(store.get("shared") == Some(json!("second")));
    ensure!(!store.contains("only_in_first"));
    Ok(())
}

#[rstest]
#[case("broken.json", "{\"database\": ")]
#[case("broken.yaml", "database: [")]
#[case("list.json", "[1, 2, 3]")]
fn malformed_files_leave_data_untouched(
    workdir: TempDir,
    #[case] name: &str,
    #[case] contents: &str,
) -> Result<()> {
    let path = write_file(utf8_dir(workdir.path())?, name, contents)?;
    let mut store = empty_store();
    store.set("kept", true)?;

    let err = store
        .load(&path)
        .err()
        .ok_or_else(|| anyhow!("expected {name} to fail"))?;
    ensure!(matches!(err, ConfigError::Parse { .. }), "unexpected error: {err}");
    ensure!(err.to_string().contains(name));
    ensure!(store.get("kept") == Some(json!(true)));
    Ok(())
}

#[rstest]
#[case("config.xyz")]
#[case("missing.yaml")]
fn load_errors_for_unsupported_or_missing(workdir: TempDir, #[case] name: &str) -> Result<()> {
    let path = workdir.path().join(name);
    let err = empty_store()
        .load(&path)
        .err()
        .ok_or_else(|| anyhow!("expected loading {name} to fail"))?;
    match name {
        "config.xyz" => ensure!(matches!(err, ConfigError::Format { .. }), "got {err}"),
        _ => ensure!(matches!(err, ConfigError::NotFound { .. }), "got {err}"),
    }
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn save_keeps_permissions_of_existing_file(workdir: TempDir) -> Result<()> {
    use std::os::unix::fs::PermissionsExt as _;

    let path = write_file(utf8_dir(workdir.path())?, "shared.yaml", "stale: true\n")?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640))
        .context("set initial mode")?;

    let mut store = empty_store();
    store.load(&path)?;
    store.set("stale", false)?;
    store.save(&path)?;

    let mode = std::fs::metadata(&path).context("stat saved file")?.permissions().mode();
    ensure!(mode & 0o777 == 0o640, "mode changed to {:o}", mode & 0o777);
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn save_creates_new_files_world_readable(workdir: TempDir) -> Result<()> {
    use std::os::unix::fs::PermissionsExt as _;

    let path = workdir.path().join("fresh.json");
    let mut store = empty_store();
    store.set("app.name", "test-app")?;
    store.save(&path)?;

    let mode = std::fs::metadata(&path).context("stat saved file")?.permissions().mode();
    ensure!(mode & 0o777 == 0o644, "new file mode is {:o}", mode & 0o777);
    Ok(())
}
