use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    //-------------------------------------------------------------------------
    // Server
    //-------------------------------------------------------------------------
    #[error("invalid listen address '{listen}'")]
    InvalidListen { listen: String },

    #[error("server.threads must be greater than zero")]
    InvalidThreads,

    #[error("invalid public_scheme '{scheme}' (expected http or https)")]
    InvalidPublicScheme { scheme: String },

    #[error("tls {kind} file does not exist: {path}")]
    MissingTlsFile { kind: &'static str, path: PathBuf },

    //-------------------------------------------------------------------------
    // Upstream
    //-------------------------------------------------------------------------
    #[error("upstream.user_agent must not be empty")]
    EmptyUserAgent,

    #[error("upstream.{field} must be greater than zero")]
    ZeroLimit { field: &'static str },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Short operator-facing hint printed by `config check`.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConfigError::ReadFile { .. } => Some(
                "The config directory must contain a lilium.hcl file.\n\
                 \n\
                 Example:\n\
                 \n\
                 server {\n\
                 \x20 listen = \"0.0.0.0:8080\"\n\
                 }",
            ),

            ConfigError::InvalidListen { .. } => Some(
                "The listen address must be an IP address and port, e.g. \"127.0.0.1:8080\".",
            ),

            ConfigError::MissingTlsFile { .. } => Some(
                "Both tls.cert and tls.key must point at readable PEM files.\n\
                 \n\
                 Remove the tls block to serve plain HTTP.",
            ),

            _ => None,
        }
    }
}
