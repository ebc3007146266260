//! Link rewriting engine.
//!
//! Every URL-bearing attribute of a fetched page is resolved against the page's
//! source URL, classified as either a render or a passthrough target, and
//! replaced with a URL that points back at this proxy.

mod classify;
mod element;
mod endpoint;
mod error;
mod resolve;
mod rewriter;

#[cfg(test)]
mod tests;

pub use classify::{Reference, RouteKind, classify, has_image_extension};
pub use element::ElementHandle;
pub use endpoint::{ProxyOrigin, escape_target};
pub use error::RewriteError;
pub use resolve::{Resolution, SchemePolicy, TargetError, parse_target, resolve};
pub use rewriter::{
    REWRITE_TARGETS, RewriteCtx, RewriteStats, RouteDecision, decide, rewrite_document,
    rewrite_element,
};
