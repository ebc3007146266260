use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiliumConfig {
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: String,

    /// Pingora worker threads. Pingora's default when unset.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Scheme used in rewritten links unless a trusted `X-Forwarded-Proto`
    /// names one.
    #[serde(default)]
    pub public_scheme: Option<String>,

    /// Honor `X-Forwarded-Proto`. Enable only behind a front proxy that
    /// overwrites the header.
    #[serde(default)]
    pub trust_forwarded_proto: bool,

    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl ServerConfig {
    pub fn default_scheme(&self) -> &str {
        match (&self.public_scheme, &self.tls) {
            (Some(scheme), _) => scheme,
            (None, Some(_)) => "https",
            (None, None) => "http",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsConfig {
    pub cert: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Fetch `http://` targets over https.
    #[serde(default = "default_upgrade_insecure")]
    pub upgrade_insecure: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Largest upstream body the render endpoint buffers.
    #[serde(default = "default_max_render_body_bytes")]
    pub max_render_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            upgrade_insecure: default_upgrade_insecure(),
            user_agent: default_user_agent(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            max_render_body_bytes: default_max_render_body_bytes(),
        }
    }
}

fn default_upgrade_insecure() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_read_timeout_ms() -> u64 {
    30_000
}

fn default_max_render_body_bytes() -> usize {
    16 * 1024 * 1024
}
