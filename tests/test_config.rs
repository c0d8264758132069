// Configuration tests
// Author: Gabriel Demetrios Lafis

use std::fs;

use rust_table_stream_engine::{
    data::{DataSet, Value},
    processing::TableExt,
    row,
    utils::{AppError, Config},
};
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.reshape.sample_size, 1000);
    assert_eq!(config.reshape.variable_label, "variable");
    assert_eq!(config.reshape.value_label, "value");
    assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
}

#[test]
fn test_load_json_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "logging": { "level": "debug" }, "reshape": { "sample_size": 10 } }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    assert_eq!(config.reshape.sample_size, 10);
    // Missing keys fall back to defaults
    assert_eq!(config.reshape.value_label, "value");
}

#[test]
fn test_load_yaml_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "reshape:\n  variable_label: attribute\n  value_label: reading\n",
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.reshape.variable_label, "attribute");
    assert_eq!(config.reshape.value_label, "reading");
}

#[test]
fn test_unsupported_config_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "level = 'info'").unwrap();

    assert!(matches!(Config::from_file(&path), Err(AppError::Config(_))));
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");

    assert!(matches!(Config::from_file(&path), Err(AppError::Io(_))));
}

#[test]
fn test_malformed_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Config::from_file(&path), Err(AppError::Config(_))));
}

#[test]
fn test_configured_labels_drive_reshape() {
    let mut config = Config::default();
    config.reshape.variable_label = "attribute".to_string();
    config.reshape.value_label = "reading".to_string();

    let wide = DataSet::from_rows(
        ["id", "age", "gender"],
        vec![row![1, 12, "F"], row![2, 17, "M"]],
    );

    let molten = wide.clone().melt(config.melt_options().with_key("id"));
    let melted = molten.collect_rows().unwrap();
    assert_eq!(melted.header.fields, vec!["id", "attribute", "reading"]);

    let recast = molten.recast(config.recast_options()).collect_rows().unwrap();
    assert_eq!(recast, wide);
    assert_eq!(recast.data[1].values[2], Value::from("M"));
}
