//! Loading server configuration from TOML files.

use playroom::ServerConfig;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_load_partial_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "port = 4100\nsession_idle_timeout_secs = 90\nai_seed = 7"
    )
    .unwrap();

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.port(), 4100);
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(config.idle_timeout(), Duration::from_secs(90));
    assert_eq!(*config.store_settings().ai_seed(), Some(7));
    assert_eq!(*config.store_settings().max_sessions(), 1024);
}

#[test]
fn test_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = \"not a number\"").unwrap();

    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_missing_file() {
    let err = ServerConfig::from_file("/nonexistent/playroom.toml").unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
    assert!(err.file.ends_with("config.rs"));
}

#[test]
fn test_cli_overrides() {
    let config = ServerConfig::default().with_host("0.0.0.0").with_port(9000);
    assert_eq!(config.bind_address(), "0.0.0.0:9000");
}
