use crate::conf::types::{LiliumConfig, ServerConfig, UpstreamConfig};
use crate::conf::ConfigError;
use std::net::SocketAddr;
use std::path::Path;

/// Reject configurations the server cannot start with.
pub fn validate(config: &LiliumConfig) -> Result<(), ConfigError> {
    validate_server(&config.server)?;
    validate_upstream(&config.upstream)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.listen.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::InvalidListen {
            listen: server.listen.clone(),
        });
    }

    if server.threads == Some(0) {
        return Err(ConfigError::InvalidThreads);
    }

    if let Some(scheme) = &server.public_scheme
        && !matches!(scheme.as_str(), "http" | "https")
    {
        return Err(ConfigError::InvalidPublicScheme {
            scheme: scheme.clone(),
        });
    }

    if let Some(tls) = &server.tls {
        for (kind, path) in [("cert", &tls.cert), ("key", &tls.key)] {
            if !Path::new(path).is_file() {
                return Err(ConfigError::MissingTlsFile {
                    kind,
                    path: path.into(),
                });
            }
        }
    }

    Ok(())
}

fn validate_upstream(upstream: &UpstreamConfig) -> Result<(), ConfigError> {
    if upstream.user_agent.trim().is_empty() {
        return Err(ConfigError::EmptyUserAgent);
    }

    let limits = [
        ("connect_timeout_ms", upstream.connect_timeout_ms),
        ("read_timeout_ms", upstream.read_timeout_ms),
        (
            "max_render_body_bytes",
            upstream.max_render_body_bytes as u64,
        ),
    ];
    for (field, value) in limits {
        if value == 0 {
            return Err(ConfigError::ZeroLimit { field });
        }
    }

    Ok(())
}
