use crate::ctx::RequestCtx;
use crate::proxy::ProxyError;
use crate::rewrite::{ProxyOrigin, RouteKind};
use pretty_assertions::assert_eq;
use url::Url;

fn routed(route: RouteKind) -> RequestCtx {
    let mut ctx = RequestCtx::empty();
    ctx.route_to(
        route,
        Url::parse("https://example.com/").unwrap(),
        ProxyOrigin::new("http", "localhost:8080"),
    );
    ctx
}

#[test]
fn every_context_gets_its_own_request_id() {
    let a = RequestCtx::empty();
    let b = RequestCtx::empty();

    assert_ne!(a.request_id, b.request_id);
    assert_eq!(a.request_id.0.len(), 36);
}

#[test]
fn empty_context_is_not_routed() {
    let ctx = RequestCtx::empty();

    assert!(ctx.route.is_none());
    assert!(!ctx.is_render());
    assert!(!ctx.buffers_body());
    assert_eq!(ctx.target_str(), "");
}

#[test]
fn route_to_records_target_and_origin() {
    let ctx = routed(RouteKind::Passthrough);

    assert_eq!(ctx.route, Some(RouteKind::Passthrough));
    assert_eq!(ctx.target_str(), "https://example.com/");
    assert_eq!(ctx.origin.unwrap().as_str(), "http://localhost:8080");
}

#[test]
fn only_successful_render_responses_are_buffered() {
    // Arrange
    let render = routed(RouteKind::Render);
    let passthrough = routed(RouteKind::Passthrough);

    let mut redirected = routed(RouteKind::Render);
    redirected.redirected = true;

    let mut failed = routed(RouteKind::Render);
    failed.failure = Some(ProxyError::bad_request("nope"));

    // Act / Assert
    assert!(render.buffers_body());
    assert!(!passthrough.buffers_body());
    assert!(!redirected.buffers_body());
    assert!(!failed.buffers_body());
}
