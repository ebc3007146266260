use crate::conf::{ConfigError, LiliumConfig, ServerConfig, TlsConfig, UpstreamConfig, validate};

fn valid() -> LiliumConfig {
    LiliumConfig {
        server: ServerConfig {
            listen: "127.0.0.1:8080".to_string(),
            threads: None,
            public_scheme: None,
            trust_forwarded_proto: false,
            tls: None,
        },
        upstream: UpstreamConfig::default(),
    }
}

#[test]
fn default_config_is_valid() {
    assert!(validate(&valid()).is_ok());
}

#[test]
fn rejects_unparseable_listen_address() {
    let mut config = valid();
    config.server.listen = "localhost".to_string();

    let err = validate(&config).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidListen { .. }), "got {err:?}");
}

#[test]
fn rejects_zero_threads() {
    let mut config = valid();
    config.server.threads = Some(0);

    assert!(matches!(
        validate(&config),
        Err(ConfigError::InvalidThreads)
    ));
}

#[test]
fn rejects_unknown_public_scheme() {
    let mut config = valid();
    config.server.public_scheme = Some("ftp".to_string());

    assert!(matches!(
        validate(&config),
        Err(ConfigError::InvalidPublicScheme { .. })
    ));
}

#[test]
fn rejects_missing_tls_files() {
    let mut config = valid();
    config.server.tls = Some(TlsConfig {
        cert: "/nonexistent/cert.pem".to_string(),
        key: "/nonexistent/key.pem".to_string(),
    });

    let err = validate(&config).unwrap_err();

    assert!(
        matches!(err, ConfigError::MissingTlsFile { kind: "cert", .. }),
        "got {err:?}"
    );
}

#[test]
fn accepts_existing_tls_files_and_defaults_to_https() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("cert.pem");
    let key = dir.path().join("key.pem");
    std::fs::write(&cert, "cert").unwrap();
    std::fs::write(&key, "key").unwrap();

    let mut config = valid();
    config.server.tls = Some(TlsConfig {
        cert: cert.display().to_string(),
        key: key.display().to_string(),
    });

    // Act
    let result = validate(&config);

    // Assert
    assert!(result.is_ok());
    assert_eq!(config.server.default_scheme(), "https");
}

#[test]
fn rejects_empty_user_agent() {
    let mut config = valid();
    config.upstream.user_agent = "  ".to_string();

    assert!(matches!(
        validate(&config),
        Err(ConfigError::EmptyUserAgent)
    ));
}

#[test]
fn rejects_zero_limits() {
    let cases: [(&str, fn(&mut UpstreamConfig)); 3] = [
        ("connect_timeout_ms", |u| u.connect_timeout_ms = 0),
        ("read_timeout_ms", |u| u.read_timeout_ms = 0),
        ("max_render_body_bytes", |u| u.max_render_body_bytes = 0),
    ];

    for (expected, zero) in cases {
        let mut config = valid();
        zero(&mut config.upstream);

        match validate(&config) {
            Err(ConfigError::ZeroLimit { field }) => assert_eq!(field, expected),
            other => panic!("expected ZeroLimit for {expected}, got {other:?}"),
        }
    }
}
