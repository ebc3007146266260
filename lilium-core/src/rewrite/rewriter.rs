use crate::rewrite::{
    ElementHandle, ProxyOrigin, Reference, Resolution, RewriteError, RouteKind, SchemePolicy,
    classify, resolve,
};
use lol_html::{HtmlRewriter, Settings, element};
use std::cell::Cell;
use url::Url;

/// Selector and URL-bearing attribute of every rewritable element.
pub const REWRITE_TARGETS: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("link[href]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
    ("meta[content]", "content"),
];

/// Per-document rewrite context. Built fresh for every fetched page.
#[derive(Debug, Clone, Copy)]
pub struct RewriteCtx<'a> {
    /// URL the document was fetched from; base for relative references.
    pub source: &'a Url,
    pub origin: &'a ProxyOrigin,
    pub policy: SchemePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Url),
    Passthrough(Url),
    Unmodified,
}

impl RouteDecision {
    fn routed(kind: RouteKind, target: Url) -> Self {
        match kind {
            RouteKind::Render => RouteDecision::Render(target),
            RouteKind::Passthrough => RouteDecision::Passthrough(target),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub rendered: usize,
    pub passed_through: usize,
    pub unmodified: usize,
}

impl RewriteStats {
    fn recorded(mut self, decision: &RouteDecision) -> Self {
        match decision {
            RouteDecision::Render(_) => self.rendered += 1,
            RouteDecision::Passthrough(_) => self.passed_through += 1,
            RouteDecision::Unmodified => self.unmodified += 1,
        }
        self
    }
}

/// Resolve and classify a single reference.
pub fn decide(reference: &Reference, ctx: &RewriteCtx<'_>) -> RouteDecision {
    let raw = reference.value.trim();

    // Same-document anchors keep working without a round trip.
    if raw.starts_with('#') {
        return RouteDecision::Unmodified;
    }

    let target = match resolve(raw, ctx.source, ctx.policy) {
        Resolution::Resolved(target) => target,
        Resolution::Unresolved(err) => {
            tracing::warn!(
                tag = %reference.tag,
                attribute = %reference.attribute,
                value = raw,
                error = %err,
                "leaving unresolvable reference untouched"
            );
            return RouteDecision::Unmodified;
        }
    };

    // javascript:, data:, mailto: and friends cannot be fetched upstream.
    if !matches!(target.scheme(), "http" | "https") {
        return RouteDecision::Unmodified;
    }

    match classify(reference, &target) {
        Some(kind) => RouteDecision::routed(kind, target),
        None => RouteDecision::Unmodified,
    }
}

/// Rewrite `attribute` of `element` in place and report what was decided.
pub fn rewrite_element<E>(element: &mut E, attribute: &str, ctx: &RewriteCtx<'_>) -> RouteDecision
where
    E: ElementHandle + ?Sized,
{
    let Some(value) = element.attr(attribute) else {
        return RouteDecision::Unmodified;
    };

    let reference = Reference {
        tag: element.tag().to_ascii_lowercase(),
        attribute: attribute.to_string(),
        value,
        rel: element.attr("rel"),
        preload_as: element.attr("as"),
        is_async: element.has_attr("async"),
    };

    let decision = decide(&reference, ctx);
    let rewritten = match &decision {
        RouteDecision::Render(target) => ctx.origin.route_url(RouteKind::Render, target),
        RouteDecision::Passthrough(target) => ctx.origin.route_url(RouteKind::Passthrough, target),
        RouteDecision::Unmodified => return decision,
    };

    if let Err(err) = element.set_attr(attribute, &rewritten) {
        tracing::warn!(tag = %reference.tag, error = %err, "failed to rewrite reference");
        return RouteDecision::Unmodified;
    }

    decision
}

/// Rewrite every reference in `markup` in a single pass.
pub fn rewrite_document(
    markup: &[u8],
    ctx: &RewriteCtx<'_>,
) -> Result<(Vec<u8>, RewriteStats), RewriteError> {
    let stats = Cell::new(RewriteStats::default());
    let stats_ref = &stats;
    let mut output = Vec::with_capacity(markup.len());

    let mut handlers = Vec::with_capacity(REWRITE_TARGETS.len());
    for &(selector, attribute) in REWRITE_TARGETS {
        handlers.push(element!(selector, move |el| {
            let decision = rewrite_element(el, attribute, ctx);
            stats_ref.set(stats_ref.get().recorded(&decision));
            Ok(())
        }));
    }

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: handlers,
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );

    rewriter.write(markup)?;
    rewriter.end()?;

    Ok((output, stats.get()))
}
