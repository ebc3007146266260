//! Body transformation for the render endpoint.
//!
//! Script and stylesheet targets are reduced to plain text; everything else
//! goes through the link rewriter.

mod content;
mod strip;


pub use content::ContentKind;
pub use strip::strip_markup;

use crate::rewrite::{ProxyOrigin, RewriteCtx, RewriteStats, SchemePolicy, rewrite_document};
use bytes::Bytes;
use url::Url;

/// Final body of a render response.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub body: Bytes,
    pub kind: ContentKind,

    /// `None` when the body was not rewritten (plain text, or the rewriter
    /// failed and the original markup is served).
    pub stats: Option<RewriteStats>,
}

pub fn render_body(
    target: &Url,
    origin: &ProxyOrigin,
    policy: SchemePolicy,
    body: &[u8],
) -> Rendered {
    let kind = ContentKind::for_target(target);

    if kind == ContentKind::PlainText {
        return Rendered {
            body: Bytes::from(strip_markup(body)),
            kind,
            stats: None,
        };
    }

    let ctx = RewriteCtx {
        source: target,
        origin,
        policy,
    };

    match rewrite_document(body, &ctx) {
        Ok((markup, stats)) => Rendered {
            body: Bytes::from(markup),
            kind,
            stats: Some(stats),
        },
        Err(err) => {
            tracing::warn!(
                target_url = %target,
                error = %err,
                "rewrite failed; serving original markup"
            );
            Rendered {
                body: Bytes::copy_from_slice(body),
                kind,
                stats: None,
            }
        }
    }
}
