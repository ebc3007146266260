use crate::rewrite::RouteKind;
use http::{HeaderMap, Uri, header};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;
use url::Url;

/// Everything except the RFC 3986 unreserved characters is escaped, so the
/// target survives as a single query parameter value.
const TARGET_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

impl RouteKind {
    /// Request path of the endpoint serving this route.
    pub const fn path(self) -> &'static str {
        match self {
            RouteKind::Render => "/render",
            RouteKind::Passthrough => "/passthrough",
        }
    }

    /// Map a request path to the endpoint it addresses.
    ///
    /// `/fetch` and `/proxy` are the older names of the two endpoints and are
    /// still accepted.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/render" | "/fetch" => Some(RouteKind::Render),
            "/passthrough" | "/proxy" => Some(RouteKind::Passthrough),
            _ => None,
        }
    }
}

/// Scheme and authority this proxy is reachable at for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyOrigin(String);

impl ProxyOrigin {
    pub fn new(scheme: &str, authority: &str) -> Self {
        Self(format!("{scheme}://{authority}"))
    }

    /// Derive the origin from the inbound request.
    ///
    /// The scheme is `default_scheme` unless `trust_forwarded` is set and the
    /// request carries `X-Forwarded-Proto`. The authority is the `Host`
    /// header, falling back to the URI authority (HTTP/2).
    pub fn from_request(
        headers: &HeaderMap,
        uri: &Uri,
        default_scheme: &str,
        trust_forwarded: bool,
    ) -> Option<Self> {
        let scheme = headers
            .get(X_FORWARDED_PROTO)
            .filter(|_| trust_forwarded)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| matches!(*s, "http" | "https"))
            .unwrap_or(default_scheme);

        let authority = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .or_else(|| uri.authority().map(|a| a.as_str()))?;

        Some(Self::new(scheme, authority))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Self-referential URL that makes the browser fetch `target` through
    /// the given endpoint.
    pub fn route_url(&self, kind: RouteKind, target: &Url) -> String {
        format!(
            "{}{}?url={}",
            self.0,
            kind.path(),
            escape_target(target.as_str())
        )
    }
}

impl fmt::Display for ProxyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn escape_target(target: &str) -> String {
    utf8_percent_encode(target, TARGET_ESCAPE).to_string()
}
