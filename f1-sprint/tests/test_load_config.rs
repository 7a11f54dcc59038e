use f1_sprint::load_config::{load_config, resolve, FileConfig, Overrides};
use f1_sprint_core::download::DEFAULT_DATASET;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_reads_all_keys() {
    let config_yaml = r#"
data_dir: ./tmp/raw
output_dir: ./tmp/processed
download: true
dataset: someone/f1-mirror
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(
        config,
        FileConfig {
            data_dir: Some(PathBuf::from("./tmp/raw")),
            output_dir: Some(PathBuf::from("./tmp/processed")),
            download: Some(true),
            dataset: Some("someone/f1-mirror".to_string()),
        }
    );
}

#[test]
fn test_empty_config_file_means_defaults() {
    let config_file = NamedTempFile::new().expect("temp file");
    let config = load_config(config_file.path()).expect("Empty config should load");
    assert_eq!(config, FileConfig::default());

    let resolved = resolve(Some(config), Overrides::default());
    assert_eq!(resolved.pipeline.data_dir, PathBuf::from("data/raw"));
    assert_eq!(resolved.pipeline.output_dir, PathBuf::from("data/processed"));
    assert!(!resolved.pipeline.download);
    assert_eq!(resolved.dataset, DEFAULT_DATASET);
}

#[test]
fn test_flags_override_config_file() {
    let file = FileConfig {
        data_dir: Some(PathBuf::from("from-file/raw")),
        output_dir: Some(PathBuf::from("from-file/out")),
        download: Some(false),
        dataset: None,
    };
    let overrides = Overrides {
        data_dir: Some(PathBuf::from("from-flag/raw")),
        output_dir: None,
        download: true,
        dataset: None,
    };

    let resolved = resolve(Some(file), overrides);

    assert_eq!(resolved.pipeline.data_dir, PathBuf::from("from-flag/raw"));
    assert_eq!(resolved.pipeline.output_dir, PathBuf::from("from-file/out"));
    assert!(resolved.pipeline.download);
}

#[test]
fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
fn test_load_config_rejects_unknown_keys() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "data_dir: x\nsources: []\n").unwrap();

    assert!(load_config(config_file.path()).is_err());
}

#[test]
fn test_load_config_errors_for_missing_file() {
    let err = load_config("definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
