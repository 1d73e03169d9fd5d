//! Loading configuration files from disk.

use std::io::Write;
use std::time::Duration;

use diaglog::config::{
    load_config, load_or_default, ConfigError, ConfigFile, ConfigProvider, DatabaseConfig,
};
use diaglog::{Level, Logger};

const APP_TOML: &str = r#"
[Server]
ENV = "production"

[Logger]
Level = "warning"
InvertOutput = false
FatalExitCode = 3

[Database]
MaxOpenConns = 20
MaxLifetime = "30m"

[Database.Primary]
Host = "db.internal"
"#;

fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(format!("{name}.toml"));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn test_extensionless_path_resolves_to_toml() {
    let dir = tempfile::tempdir().unwrap();
    let written = write_config(&dir, "app", APP_TOML);

    let base = dir.path().join("app");
    let resolved = ConfigFile::from_path(base.to_str().unwrap()).resolve();
    assert_eq!(resolved, written);

    let config = load_config(&resolved).unwrap();
    assert_eq!(config.server.env, "production");
    assert_eq!(config.logger.level, Level::Warning);
    assert!(!config.logger.invert_output);
}

#[test]
fn test_provider_and_database_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "app", APP_TOML);

    let provider = ConfigProvider::from_file(&path).unwrap();
    assert_eq!(provider.get_string("Server.ENV", &["undefine"]), "production");
    assert_eq!(provider.get_string("Server.Region", &["undefine"]), "undefine");

    let database = DatabaseConfig::from_provider(&provider, None);
    assert_eq!(database.max_open_conns, 20);
    assert_eq!(database.max_idle_conns, 5);
    assert_eq!(database.max_lifetime, Duration::from_secs(1800));
    assert_eq!(database.primary.host, "db.internal");
    assert_eq!(database.primary.port, 5432);
}

#[test]
fn test_logger_from_config_filters_levels() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "app", APP_TOML);

    let config = load_config(&path).unwrap();
    let logger = Logger::from_config(&config.logger);
    assert_eq!(logger.min_level(), Level::Warning);
    assert!(!logger.enabled(Level::Info));
    assert!(logger.enabled(Level::Fatal));
    assert!(!logger.trace_options().invert_output);
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "bad",
        "[Server]\nName = \"\"\n[Logger]\nFatalExitCode = 0\n",
    );

    match load_config(&path) {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "broken", "[Server\nENV = ");

    assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_startup_load_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (config, provider, error) = load_or_default(&dir.path().join("missing.toml"));

    assert!(matches!(error, Some(ConfigError::Io { .. })));
    assert_eq!(config.logger.level, Level::Debug);
    assert_eq!(provider.get_string("Server.ENV", &["undefine"]), "undefine");
}

#[test]
fn test_startup_load_keeps_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "app", APP_TOML);
    let (config, provider, error) = load_or_default(&path);

    assert!(error.is_none());
    assert_eq!(config.logger.fatal_exit_code, 3);
    assert_eq!(provider.get_string("Server.ENV", &[]), "production");
}
