use crate::ctx::RequestCtx;
use crate::proxy::error_classification::classify_pingora_error;
use crate::proxy::handlers::{LandingHandler, send_redirect, send_text};
use crate::proxy::request_classification::{RequestKind, classify_request, query_param};
use crate::proxy::upstream::{
    build_peer, failure_header, is_redirect, outbound_request, passthrough_header, render_header,
    rewrite_location,
};
use crate::proxy::{GatewaySettings, ProxyError};
use crate::render::{ContentKind, render_body};
use crate::rewrite::{ProxyOrigin, RouteKind, escape_target, parse_target};
use async_trait::async_trait;
use bytes::Bytes;
use http::header;
use pingora::prelude::*;
use pingora::proxy::FailToProxy;
use pingora_http::{RequestHeader, ResponseHeader};
use std::time::Duration;

/// LiliumGateway wires the rewrite engine into the Pingora request lifecycle.
pub struct LiliumGateway {
    settings: GatewaySettings,
    landing_handler: LandingHandler,
}

impl LiliumGateway {
    pub fn new(settings: GatewaySettings) -> Self {
        Self {
            settings,
            landing_handler: LandingHandler,
        }
    }

    /// Validate the `url` parameter and record the routing decision.
    /// Returns the error response to send when the request cannot be routed.
    fn route_request(
        &self,
        session: &Session,
        route: RouteKind,
        ctx: &mut RequestCtx,
    ) -> Result<(), ProxyError> {
        let req = session.req_header();
        let raw = query_param(&req.uri, "url").unwrap_or_default();
        let target = parse_target(&raw, self.settings.policy)?;

        let origin = ProxyOrigin::from_request(
            &req.headers,
            &req.uri,
            &self.settings.default_scheme,
            self.settings.trust_forwarded_proto,
        )
        .ok_or_else(|| ProxyError::bad_request("missing Host header"))?;

        ctx.route_to(route, target, origin);
        Ok(())
    }

    fn render_response(
        &self,
        upstream: &mut ResponseHeader,
        ctx: &mut RequestCtx,
    ) -> Result<()> {
        let status = upstream.status;
        let target = ctx.target_str().to_string();

        let failure = if !status.is_success() {
            Some(ProxyError::UpstreamStatus {
                target,
                status: status.as_u16(),
            })
        } else if declared_length(upstream)
            .is_some_and(|len| len > self.settings.max_render_body_bytes)
        {
            Some(ProxyError::BodyTooLarge {
                target,
                limit: self.settings.max_render_body_bytes,
            })
        } else {
            None
        };

        if let Some(err) = failure {
            tracing::warn!(request_id = %ctx.request_id, error = %err, "render failed");
            *upstream = failure_header(&err)?;
            ctx.failure = Some(err);
            return Ok(());
        }

        let kind = ctx
            .target
            .as_ref()
            .map(ContentKind::for_target)
            .unwrap_or(ContentKind::Html);
        *upstream = render_header(upstream, kind)?;
        Ok(())
    }
}

/// Pingora hook execution order for a render or passthrough request:
///
/// 1. new_ctx()
///    - Fresh RequestCtx with a request id
///
/// 2. request_filter()
///    - Landing assets, form submits and bad requests end here
///    - Otherwise parse the `url` parameter and derive the proxy origin
///
/// 3. upstream_peer()
///    - Resolve the target host, build the HttpPeer
///
/// 4. upstream_request_filter()
///    - Replace the client request with a fresh GET for the target
///
/// 5. [Pingora upstream I/O]
///
/// 6. response_filter()
///    - Rewrite redirects back through the proxy
///    - Render: error status becomes 500, success switches to a chunked body
///    - Passthrough: keep status and the body describing headers
///
/// 7. response_body_filter()
///    - Render: buffer, then rewrite or strip at end of stream
///    - Passthrough: untouched
///
/// 8. fail_to_proxy()
///    - Connect/TLS/DNS failures become a 500 with the cause as body
///
/// 9. logging()   /// ALWAYS LAST
#[async_trait]
impl ProxyHttp for LiliumGateway {
    type CTX = RequestCtx;

    fn new_ctx(&self) -> Self::CTX {
        RequestCtx::empty()
    }

    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        match classify_request(session.req_header()) {
            RequestKind::Landing { path } => self.landing_handler.handle(session, &path).await,

            RequestKind::FormSubmit => {
                let location = match query_param(&session.req_header().uri, "url") {
                    Some(url) if !url.trim().is_empty() => {
                        format!("{}?url={}", RouteKind::Render.path(), escape_target(url.trim()))
                    }
                    _ => "/".to_string(),
                };
                send_redirect(session, &location).await?;
                Ok(true)
            }

            RequestKind::Route(route) => match self.route_request(session, route, ctx) {
                Ok(()) => {
                    tracing::debug!(
                        request_id = %ctx.request_id,
                        endpoint = route.as_str(),
                        target = ctx.target_str(),
                        "routing request upstream"
                    );
                    Ok(false)
                }
                Err(err) => {
                    ctx.route = Some(route);
                    send_text(session, err.status_code(), &err.to_string()).await?;
                    ctx.failure = Some(err);
                    Ok(true)
                }
            },
        }
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        let target = ctx
            .target
            .as_ref()
            .ok_or_else(|| Error::new(Custom("no upstream target selected")))?;

        match build_peer(target, &self.settings).await {
            Ok(peer) => Ok(Box::new(peer)),
            Err(err) => {
                let pingora_err = err.as_pingora_error();
                ctx.failure = Some(err);
                Err(pingora_err)
            }
        }
    }

    async fn upstream_request_filter(
        &self,
        session: &mut Session,
        upstream: &mut RequestHeader,
        ctx: &mut Self::CTX,
    ) -> Result<()> {
        let (Some(target), Some(route)) = (ctx.target.as_ref(), ctx.route) else {
            return Err(Error::new(Custom("request was not routed")));
        };

        *upstream = outbound_request(
            target,
            route,
            &session.req_header().headers,
            &self.settings.user_agent,
        )?;

        Ok(())
    }

    async fn response_filter(
        &self,
        _session: &mut Session,
        upstream: &mut ResponseHeader,
        ctx: &mut Self::CTX,
    ) -> Result<()> {
        let (Some(route), Some(target), Some(origin)) =
            (ctx.route, ctx.target.as_ref(), ctx.origin.as_ref())
        else {
            return Ok(());
        };

        let status = upstream.status;
        ctx.upstream_status = Some(status);

        if is_redirect(status) {
            let location = upstream
                .headers
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|loc| rewrite_location(loc, target, route, origin, self.settings.policy));

            if let Some(location) = location {
                tracing::debug!(
                    request_id = %ctx.request_id,
                    status = status.as_u16(),
                    location = %location,
                    "following upstream redirect through proxy"
                );
                ctx.redirected = true;
                let mut resp = passthrough_header(upstream)?;
                resp.insert_header(header::LOCATION, location)?;
                *upstream = resp;
                return Ok(());
            }
        }

        match route {
            RouteKind::Render => self.render_response(upstream, ctx),
            RouteKind::Passthrough => {
                *upstream = passthrough_header(upstream)?;
                Ok(())
            }
        }
    }

    fn response_body_filter(
        &self,
        _session: &mut Session,
        body: &mut Option<Bytes>,
        end_of_stream: bool,
        ctx: &mut Self::CTX,
    ) -> Result<Option<Duration>>
    where
        Self::CTX: Send + Sync,
    {
        // The error response replaced the upstream one; its body replaces the
        // upstream body.
        if let Some(err) = &ctx.failure {
            body.take();
            if end_of_stream {
                *body = Some(Bytes::from(err.to_string()));
            }
            return Ok(None);
        }

        if !ctx.buffers_body() {
            return Ok(None);
        }

        if let Some(chunk) = body.take() {
            let limit = self.settings.max_render_body_bytes;
            if ctx.body.len() + chunk.len() > limit {
                // The status line is already on the wire, so the response is
                // aborted instead.
                let err = ProxyError::BodyTooLarge {
                    target: ctx.target_str().to_string(),
                    limit,
                };
                let pingora_err = err.as_pingora_error();
                ctx.failure = Some(err);
                return Err(pingora_err);
            }
            ctx.body.extend_from_slice(&chunk);
        }

        if end_of_stream {
            let (Some(target), Some(origin)) = (ctx.target.as_ref(), ctx.origin.as_ref()) else {
                return Err(Error::new(Custom("render context incomplete")));
            };

            let rendered = render_body(target, origin, self.settings.policy, &ctx.body);
            ctx.body.clear();
            ctx.rewrite_stats = rendered.stats;
            *body = Some(rendered.body);
        }

        Ok(None)
    }

    async fn fail_to_proxy(
        &self,
        session: &mut Session,
        e: &Error,
        ctx: &mut Self::CTX,
    ) -> FailToProxy
    where
        Self::CTX: Send + Sync,
    {
        let failure = ctx.failure.take().unwrap_or_else(|| {
            ProxyError::fetch(
                ctx.target_str(),
                format!("{} ({})", classify_pingora_error(e).as_str(), e.etype().as_str()),
            )
        });
        let status = failure.status_code();

        // Nothing can be sent once the upstream response started streaming.
        if session.response_written().is_none()
            && let Err(write_err) = send_text(session, status, &failure.to_string()).await
        {
            tracing::warn!(
                request_id = %ctx.request_id,
                error = %write_err,
                "failed to write error response"
            );
        }

        ctx.failure = Some(failure);

        FailToProxy {
            error_code: status.as_u16(),
            can_reuse_downstream: false,
        }
    }

    async fn logging(&self, session: &mut Session, e: Option<&Error>, ctx: &mut Self::CTX)
    where
        Self::CTX: Send + Sync,
    {
        let status = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(0);
        let endpoint = ctx.route.map(RouteKind::as_str).unwrap_or("landing");
        let error = ctx
            .failure
            .as_ref()
            .map(ToString::to_string)
            .or_else(|| e.map(ToString::to_string));
        let error = error.as_deref();

        tracing::info!(
            request_id = %ctx.request_id,
            endpoint,
            target = ctx.target_str(),
            status,
            upstream_status = ctx.upstream_status.map(|s| s.as_u16()),
            redirected = ctx.redirected,
            rendered = ctx.rewrite_stats.map(|s| s.rendered),
            passed_through = ctx.rewrite_stats.map(|s| s.passed_through),
            error,
            "request completed"
        );
    }
}

fn declared_length(resp: &ResponseHeader) -> Option<usize> {
    resp.headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
