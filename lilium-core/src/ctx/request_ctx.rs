use crate::ctx::RequestId;
use crate::proxy::ProxyError;
use crate::rewrite::{ProxyOrigin, RewriteStats, RouteKind};
use bytes::BytesMut;
use http::StatusCode;
use url::Url;

/// Per-request state carried through the Pingora hooks.
#[derive(Debug)]
pub struct RequestCtx {
    pub request_id: RequestId,

    /// Endpoint addressed by the request. `None` for landing assets.
    pub route: Option<RouteKind>,

    /// Upstream URL taken from the `url` query parameter.
    pub target: Option<Url>,

    /// Origin rewritten references point back at.
    pub origin: Option<ProxyOrigin>,

    pub upstream_status: Option<StatusCode>,

    /// Upstream answered with a redirect; the body is forwarded as-is.
    pub redirected: bool,

    /// Set once the request is known to fail. The message becomes the body of
    /// the error response.
    pub failure: Option<ProxyError>,

    /// Render responses are buffered here until the upstream body ends.
    pub body: BytesMut,

    pub rewrite_stats: Option<RewriteStats>,
}

impl Default for RequestCtx {
    fn default() -> Self {
        Self::empty()
    }
}

impl RequestCtx {
    pub fn empty() -> Self {
        Self {
            request_id: RequestId::default(),
            route: None,
            target: None,
            origin: None,
            upstream_status: None,
            redirected: false,
            failure: None,
            body: BytesMut::new(),
            rewrite_stats: None,
        }
    }

    /// Record the routing decision made in `request_filter`.
    pub fn route_to(&mut self, route: RouteKind, target: Url, origin: ProxyOrigin) {
        self.route = Some(route);
        self.target = Some(target);
        self.origin = Some(origin);
    }

    pub fn is_render(&self) -> bool {
        self.route == Some(RouteKind::Render)
    }

    /// True when the upstream body must be collected before anything is sent
    /// downstream.
    pub fn buffers_body(&self) -> bool {
        self.is_render() && !self.redirected && self.failure.is_none()
    }

    /// Target for log lines; empty when the request was not routed upstream.
    pub fn target_str(&self) -> &str {
        self.target.as_ref().map(Url::as_str).unwrap_or_default()
    }
}
