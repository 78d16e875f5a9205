use serde::Deserialize;
use std::fs;
use tempfile::TempDir;
use vdist_fs::{ConfigStore, Error};

#[derive(Debug, Deserialize, PartialEq)]
struct TestSettings {
    user: String,
    purge: bool,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("dist.toml");
    fs::write(&file_path, "user = \"nimbus\"\npurge = true\n").unwrap();

    let settings: TestSettings = ConfigStore::new().load(&file_path).unwrap();

    assert_eq!(
        settings,
        TestSettings {
            user: "nimbus".into(),
            purge: true
        }
    );
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("dist.json");
    fs::write(&file_path, r#"{"user": "beacon", "purge": false}"#).unwrap();

    let settings: TestSettings = ConfigStore::new().load(&file_path).unwrap();

    assert_eq!(settings.user, "beacon");
    assert!(!settings.purge);
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("dist.ini");
    fs::write(&file_path, "user=nimbus").unwrap();

    let result: vdist_fs::Result<TestSettings> = ConfigStore::new().load(&file_path);

    assert!(matches!(result, Err(Error::UnsupportedFormat { extension }) if extension == "ini"));
}

#[test]
fn test_malformed_toml_reports_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("dist.toml");
    fs::write(&file_path, "user = ").unwrap();

    let result: vdist_fs::Result<TestSettings> = ConfigStore::new().load(&file_path);

    match result {
        Err(Error::ConfigParse { format, .. }) => assert_eq!(format, "TOML"),
        other => panic!("expected ConfigParse, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let result: vdist_fs::Result<TestSettings> =
        ConfigStore::new().load(&temp.path().join("absent.toml"));

    assert!(matches!(result, Err(Error::Io { .. })));
}
