use crate::rewrite::tests::fake_element::FakeElement;
use crate::rewrite::{
    ElementHandle, ProxyOrigin, RewriteCtx, RouteDecision, SchemePolicy, rewrite_element,
};
use pretty_assertions::assert_eq;
use url::Url;

fn source() -> Url {
    Url::parse("https://example.com/docs/index.html").unwrap()
}

fn origin() -> ProxyOrigin {
    ProxyOrigin::new("https", "proxy.test")
}

fn rewrite(mut element: FakeElement, attribute: &str) -> (FakeElement, RouteDecision) {
    let source = source();
    let origin = origin();
    let ctx = RewriteCtx {
        source: &source,
        origin: &origin,
        policy: SchemePolicy::UpgradeInsecure,
    };

    let decision = rewrite_element(&mut element, attribute, &ctx);
    (element, decision)
}

#[test]
fn relative_image_becomes_passthrough_url() {
    // Arrange
    let img = FakeElement::new("img").with("src", "logo.png");

    // Act
    let (img, decision) = rewrite(img, "src");

    // Assert
    assert_eq!(
        decision,
        RouteDecision::Passthrough(Url::parse("https://example.com/docs/logo.png").unwrap())
    );
    assert_eq!(
        img.attr("src").unwrap(),
        "https://proxy.test/passthrough?url=https%3A%2F%2Fexample.com%2Fdocs%2Flogo.png"
    );
}

#[test]
fn root_relative_anchor_becomes_render_url() {
    let a = FakeElement::new("a").with("href", "/about");

    let (a, decision) = rewrite(a, "href");

    assert_eq!(
        decision,
        RouteDecision::Render(Url::parse("https://example.com/about").unwrap())
    );
    assert_eq!(
        a.attr("href").unwrap(),
        "https://proxy.test/render?url=https%3A%2F%2Fexample.com%2Fabout"
    );
}

#[test]
fn absolute_http_reference_is_upgraded_before_rewriting() {
    let a = FakeElement::new("a").with("href", "http://other.test/page?q=a b");

    let (a, _) = rewrite(a, "href");

    assert_eq!(
        a.attr("href").unwrap(),
        "https://proxy.test/render?url=https%3A%2F%2Fother.test%2Fpage%3Fq%3Da%2520b"
    );
}

#[test]
fn uppercase_tag_names_are_classified() {
    let script = FakeElement::new("SCRIPT")
        .with("src", "/tag")
        .with("async", "");

    let (_, decision) = rewrite(script, "src");

    assert!(
        matches!(decision, RouteDecision::Passthrough(_)),
        "got {decision:?}"
    );
}

#[test]
fn sibling_attributes_drive_link_classification() {
    let link = FakeElement::new("link")
        .with("rel", "stylesheet")
        .with("href", "../site.css");

    let (link, decision) = rewrite(link, "href");

    assert_eq!(
        decision,
        RouteDecision::Passthrough(Url::parse("https://example.com/site.css").unwrap())
    );
    assert!(
        link.attr("href")
            .unwrap()
            .starts_with("https://proxy.test/passthrough?url=")
    );
}

#[test]
fn unresolvable_reference_is_left_untouched() {
    let a = FakeElement::new("a").with("href", "http://[::1");

    let (a, decision) = rewrite(a, "href");

    assert_eq!(decision, RouteDecision::Unmodified);
    assert_eq!(a.attr("href").unwrap(), "http://[::1");
}

#[test]
fn non_fetchable_schemes_are_left_untouched() {
    for value in [
        "javascript:void(0)",
        "mailto:team@example.com",
        "data:image/png;base64,AAAA",
        "tel:+15550100",
    ] {
        let a = FakeElement::new("a").with("href", value);

        let (a, decision) = rewrite(a, "href");

        assert_eq!(decision, RouteDecision::Unmodified, "value {value:?}");
        assert_eq!(a.attr("href").unwrap(), value);
    }
}

#[test]
fn fragment_only_reference_is_left_untouched() {
    let a = FakeElement::new("a").with("href", "#section-2");

    let (a, decision) = rewrite(a, "href");

    assert_eq!(decision, RouteDecision::Unmodified);
    assert_eq!(a.attr("href").unwrap(), "#section-2");
}

#[test]
fn meta_without_url_is_left_untouched() {
    let meta = FakeElement::new("meta")
        .with("name", "viewport")
        .with("content", "width=device-width, initial-scale=1");

    let (meta, decision) = rewrite(meta, "content");

    assert_eq!(decision, RouteDecision::Unmodified);
    assert_eq!(
        meta.attr("content").unwrap(),
        "width=device-width, initial-scale=1"
    );
}

#[test]
fn missing_attribute_is_unmodified() {
    let img = FakeElement::new("img").with("alt", "nothing");

    let (_, decision) = rewrite(img, "src");

    assert_eq!(decision, RouteDecision::Unmodified);
}
