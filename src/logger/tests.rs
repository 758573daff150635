use super::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_file_layer_creates_missing_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested/dir/notifier.log");
    let config = FileConfig::new(true, path.clone(), true, LogFormat::Compact).unwrap();

    assert!(file_layer(&config).is_ok());
    assert!(path.exists());
}

#[test]
fn test_truncate_mode_clears_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notifier.log");
    std::fs::write(&path, "old content\n").unwrap();

    let config = FileConfig::new(true, path.clone(), false, LogFormat::Full).unwrap();
    let _writer = writer::open_log_file(&config).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_open_log_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    // A directory cannot be opened as a log file
    let config = FileConfig::new(true, temp_dir.path().to_path_buf(), true, LogFormat::Json).unwrap();

    match writer::open_log_file(&config) {
        Err(LoggerError::OpenFile { path, .. }) => assert_eq!(path, PathBuf::from(temp_dir.path())),
        other => panic!("Expected OpenFile error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_init_logger_rejects_invalid_config() {
    let config = LoggerConfig {
        level: "chatty".to_string(),
        ..Default::default()
    };
    assert!(init_logger(config).is_err());
}

#[test]
fn test_init_logger_writes_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notifier.log");
    let config = LoggerConfig::new(
        ConsoleConfig::new(false, false),
        FileConfig::new(true, path.clone(), true, LogFormat::Json).unwrap(),
        "debug".to_string(),
    )
    .unwrap();

    init_logger(config).expect("first initialization succeeds");
    tracing::info!(incident = "group-1", "logger smoke test");

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("logger smoke test"));
    assert!(contents.contains("group-1"));

    // A second global subscriber is refused
    assert!(init_logger(LoggerConfig::default()).is_err());
}
