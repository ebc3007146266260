use crate::conf::LiliumConfig;
use crate::rewrite::SchemePolicy;
use std::time::Duration;

/// Immutable per-process settings shared by every request.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub policy: SchemePolicy,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_render_body_bytes: usize,

    /// Scheme of rewritten links when the request does not name one.
    pub default_scheme: String,
    pub trust_forwarded_proto: bool,
}

impl GatewaySettings {
    pub fn from_config(config: &LiliumConfig) -> Self {
        let upstream = &config.upstream;
        Self {
            policy: SchemePolicy::from_upgrade_flag(upstream.upgrade_insecure),
            user_agent: upstream.user_agent.clone(),
            connect_timeout: Duration::from_millis(upstream.connect_timeout_ms),
            read_timeout: Duration::from_millis(upstream.read_timeout_ms),
            max_render_body_bytes: upstream.max_render_body_bytes,
            default_scheme: config.server.default_scheme().to_string(),
            trust_forwarded_proto: config.server.trust_forwarded_proto,
        }
    }
}
