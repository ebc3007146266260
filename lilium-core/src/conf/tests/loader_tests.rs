use crate::conf::types::DEFAULT_USER_AGENT;
use crate::conf::{CONFIG_FILE, ConfigError, UpstreamConfig, load_config};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn config_dir(contents: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), contents).unwrap();
    dir
}

#[test]
fn loads_minimal_config_with_upstream_defaults() {
    // Arrange
    let dir = config_dir(
        r#"
server {
  listen = "127.0.0.1:8080"
}
"#,
    );

    // Act
    let config = load_config(dir.path()).unwrap();

    // Assert
    assert_eq!(config.server.listen, "127.0.0.1:8080");
    assert_eq!(config.server.threads, None);
    assert_eq!(config.server.tls, None);
    assert_eq!(config.server.default_scheme(), "http");
    assert_eq!(config.upstream, UpstreamConfig::default());
    assert!(config.upstream.upgrade_insecure);
    assert_eq!(config.upstream.user_agent, DEFAULT_USER_AGENT);
    assert!(!config.server.trust_forwarded_proto);
    assert_eq!(config.upstream.connect_timeout_ms, 10_000);
    assert_eq!(config.upstream.read_timeout_ms, 30_000);
    assert_eq!(config.upstream.max_render_body_bytes, 16 * 1024 * 1024);
}

#[test]
fn loads_full_config() {
    let dir = config_dir(
        r#"
server {
  listen        = "0.0.0.0:9000"
  threads       = 2
  public_scheme = "https"
  trust_forwarded_proto = true
}

upstream {
  upgrade_insecure      = false
  user_agent            = "lilium-test"
  connect_timeout_ms    = 500
  read_timeout_ms       = 1500
  max_render_body_bytes = 1024
}
"#,
    );

    let config = load_config(dir.path()).unwrap();

    assert_eq!(config.server.threads, Some(2));
    assert_eq!(config.server.default_scheme(), "https");
    assert!(config.server.trust_forwarded_proto);
    assert_eq!(
        config.upstream,
        UpstreamConfig {
            upgrade_insecure: false,
            user_agent: "lilium-test".to_string(),
            connect_timeout_ms: 500,
            read_timeout_ms: 1500,
            max_render_body_bytes: 1024,
        }
    );
}

#[test]
fn partial_upstream_block_keeps_remaining_defaults() {
    let dir = config_dir(
        r#"
server {
  listen = "127.0.0.1:8080"
}

upstream {
  upgrade_insecure = false
}
"#,
    );

    let config = load_config(dir.path()).unwrap();

    assert!(!config.upstream.upgrade_insecure);
    assert_eq!(config.upstream.user_agent, DEFAULT_USER_AGENT);
}

#[test]
fn missing_config_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }), "got {err:?}");
    assert!(err.hint().is_some());
}

#[test]
fn unknown_fields_are_rejected() {
    let dir = config_dir(
        r#"
server {
  listen = "127.0.0.1:8080"
  listen_backlog = 10
}
"#,
    );

    let err = load_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
}

#[test]
fn server_block_is_required() {
    let dir = config_dir("upstream {\n  upgrade_insecure = true\n}\n");

    let err = load_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
}
