//! Outbound side of a proxied request: peer selection, the fresh upstream
//! request and the response headers sent back downstream.

use crate::proxy::{GatewaySettings, ProxyError};
use crate::render::ContentKind;
use crate::rewrite::{ProxyOrigin, Resolution, RouteKind, SchemePolicy, resolve};
use http::{HeaderMap, HeaderName, Method, StatusCode, header};
use pingora::prelude::HttpPeer;
use pingora_http::{RequestHeader, ResponseHeader};
use std::net::SocketAddr;
use url::{Host, Position, Url};

/// Client headers worth forwarding to the upstream.
const FORWARDED_CLIENT_HEADERS: &[HeaderName] = &[header::ACCEPT, header::ACCEPT_LANGUAGE];

/// Upstream headers a passthrough response keeps. `Location` is only ever
/// sent after rewriting.
const PASSTHROUGH_HEADERS: &[HeaderName] = &[
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::CONTENT_ENCODING,
];

/// Resolve the target host and build the peer Pingora connects to.
///
/// Name resolution happens here rather than inside Pingora so that an unknown
/// host becomes an ordinary fetch failure.
pub(crate) async fn build_peer(
    target: &Url,
    settings: &GatewaySettings,
) -> Result<HttpPeer, ProxyError> {
    let port = target
        .port_or_known_default()
        .ok_or_else(|| ProxyError::fetch(target.as_str(), "no port for scheme"))?;

    let (addr, sni) = match target.host() {
        Some(Host::Ipv4(ip)) => (SocketAddr::from((ip, port)), String::new()),
        Some(Host::Ipv6(ip)) => (SocketAddr::from((ip, port)), String::new()),
        Some(Host::Domain(domain)) => {
            let addr = tokio::net::lookup_host((domain, port))
                .await
                .map_err(|e| ProxyError::fetch(target.as_str(), format!("dns: {e}")))?
                .next()
                .ok_or_else(|| ProxyError::fetch(target.as_str(), "dns: no addresses"))?;
            (addr, domain.to_string())
        }
        None => return Err(ProxyError::fetch(target.as_str(), "missing host")),
    };

    let tls = target.scheme() == "https";
    let mut peer = HttpPeer::new(addr, tls, sni);
    peer.options.connection_timeout = Some(settings.connect_timeout);
    peer.options.read_timeout = Some(settings.read_timeout);

    Ok(peer)
}

/// Fresh `GET` for `target`. Nothing from the client request is forwarded
/// except the content negotiation headers.
pub(crate) fn outbound_request(
    target: &Url,
    route: RouteKind,
    client_headers: &HeaderMap,
    user_agent: &str,
) -> pingora::Result<RequestHeader> {
    let path = &target[Position::BeforePath..Position::AfterQuery];
    let mut req = RequestHeader::build(Method::GET, path.as_bytes(), None)?;

    req.insert_header(
        header::HOST,
        &target[Position::BeforeHost..Position::AfterPort],
    )?;
    req.insert_header(header::USER_AGENT, user_agent)?;
    req.insert_header(header::ORIGIN, target.origin().ascii_serialization())?;
    req.insert_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")?;
    req.insert_header(header::ACCESS_CONTROL_ALLOW_METHODS, "*")?;

    // The render endpoint parses the body and cannot decode it.
    if route == RouteKind::Render {
        req.insert_header(header::ACCEPT_ENCODING, "identity")?;
    }

    for name in FORWARDED_CLIENT_HEADERS {
        if let Some(value) = client_headers.get(name) {
            req.insert_header(name.clone(), value.clone())?;
        }
    }

    Ok(req)
}

/// Point an upstream redirect back at the endpoint that received it.
pub(crate) fn rewrite_location(
    location: &str,
    target: &Url,
    route: RouteKind,
    origin: &ProxyOrigin,
    policy: SchemePolicy,
) -> Option<String> {
    match resolve(location, target, policy) {
        Resolution::Resolved(next) if matches!(next.scheme(), "http" | "https") => {
            Some(origin.route_url(route, &next))
        }
        _ => None,
    }
}

/// Downstream header for a successful render. Only the upstream status
/// survives. The body length is unknown until the rewrite completes.
pub(crate) fn render_header(
    upstream: &ResponseHeader,
    kind: ContentKind,
) -> pingora::Result<ResponseHeader> {
    let mut resp = ResponseHeader::build(upstream.status, None)?;
    resp.insert_header(header::CONTENT_TYPE, kind.content_type())?;
    resp.insert_header(header::TRANSFER_ENCODING, "chunked")?;
    allow_any_origin(&mut resp)?;
    resp.insert_header(header::ACCESS_CONTROL_ALLOW_METHODS, "*")?;
    Ok(resp)
}

/// Downstream header for a passthrough response: the upstream status plus
/// the headers describing the body.
pub(crate) fn passthrough_header(upstream: &ResponseHeader) -> pingora::Result<ResponseHeader> {
    let mut resp = ResponseHeader::build(upstream.status, None)?;

    for name in PASSTHROUGH_HEADERS {
        if let Some(value) = upstream.headers.get(name) {
            resp.insert_header(name.clone(), value.clone())?;
        }
    }

    if !resp.headers.contains_key(header::CONTENT_LENGTH) {
        resp.insert_header(header::TRANSFER_ENCODING, "chunked")?;
    }

    allow_any_origin(&mut resp)?;
    Ok(resp)
}

/// Header of an error response whose body is written later.
pub(crate) fn failure_header(err: &ProxyError) -> pingora::Result<ResponseHeader> {
    let mut resp = ResponseHeader::build(err.status_code(), None)?;
    resp.insert_header(header::CONTENT_TYPE, "text/plain; charset=utf-8")?;
    resp.insert_header(header::TRANSFER_ENCODING, "chunked")?;
    Ok(resp)
}

pub(crate) fn is_redirect(status: StatusCode) -> bool {
    status.is_redirection() && status != StatusCode::NOT_MODIFIED
}

fn allow_any_origin(resp: &mut ResponseHeader) -> pingora::Result<()> {
    resp.insert_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
}
