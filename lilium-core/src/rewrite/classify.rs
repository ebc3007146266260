use url::Url;

/// Path suffixes that are always streamed as opaque bytes.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".ico", ".svg"];

/// Which proxy endpoint a rewritten reference re-enters through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Fetch, parse and rewrite again.
    Render,

    /// Stream the upstream bytes unmodified.
    Passthrough,
}

impl RouteKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteKind::Render => "render",
            RouteKind::Passthrough => "passthrough",
        }
    }
}

/// One URL-bearing attribute occurrence inside a document, together with the
/// sibling attributes that influence its classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    /// Lowercase tag name.
    pub tag: String,
    pub attribute: String,
    pub value: String,
    pub rel: Option<String>,
    /// Value of the `as` attribute on preload links.
    pub preload_as: Option<String>,
    pub is_async: bool,
}

impl Reference {
    pub fn new(
        tag: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attribute: attribute.into().to_ascii_lowercase(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    pub fn with_preload_as(mut self, preload_as: impl Into<String>) -> Self {
        self.preload_as = Some(preload_as.into());
        self
    }

    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    fn rel_contains(&self, token: &str) -> bool {
        self.rel.as_deref().is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|t| t.eq_ignore_ascii_case(token))
        })
    }
}

struct Rule {
    name: &'static str,
    attribute: &'static str,
    route: RouteKind,
    applies: fn(&Reference, &Url) -> bool,
}

/// Classification table. Order matters: the first rule that applies wins.
const RULES: &[Rule] = &[
    Rule {
        name: "link-icon",
        attribute: "href",
        route: RouteKind::Passthrough,
        applies: link_icon,
    },
    Rule {
        name: "link-stylesheet",
        attribute: "href",
        route: RouteKind::Passthrough,
        applies: link_stylesheet,
    },
    Rule {
        name: "link-preload-script",
        attribute: "href",
        route: RouteKind::Passthrough,
        applies: link_preload_script,
    },
    Rule {
        name: "link-image",
        attribute: "href",
        route: RouteKind::Passthrough,
        applies: link_image,
    },
    Rule {
        name: "link-other",
        attribute: "href",
        route: RouteKind::Render,
        applies: is_link,
    },
    Rule {
        name: "href-image",
        attribute: "href",
        route: RouteKind::Passthrough,
        applies: image_target,
    },
    Rule {
        name: "href-other",
        attribute: "href",
        route: RouteKind::Render,
        applies: always,
    },
    Rule {
        name: "meta-url",
        attribute: "content",
        route: RouteKind::Passthrough,
        applies: meta_url,
    },
    Rule {
        name: "script-js",
        attribute: "src",
        route: RouteKind::Passthrough,
        applies: script_js,
    },
    Rule {
        name: "script-async",
        attribute: "src",
        route: RouteKind::Passthrough,
        applies: script_async,
    },
    Rule {
        name: "src-image",
        attribute: "src",
        route: RouteKind::Passthrough,
        applies: image_target,
    },
    Rule {
        name: "src-other",
        attribute: "src",
        route: RouteKind::Render,
        applies: always,
    },
];

/// Decide which endpoint serves `target`, the resolved form of `reference`.
///
/// Returns `None` when no rule covers the reference (for example a `meta`
/// whose content is not a URL); such references are left untouched.
pub fn classify(reference: &Reference, target: &Url) -> Option<RouteKind> {
    let rule = RULES.iter().find(|rule| {
        rule.attribute.eq_ignore_ascii_case(&reference.attribute) && (rule.applies)(reference, target)
    })?;

    tracing::trace!(
        rule = rule.name,
        tag = %reference.tag,
        target = %target,
        route = rule.route.as_str(),
        "reference classified"
    );

    Some(rule.route)
}

/// True when the target's path ends in one of the image extensions
/// (case-insensitive).
pub fn has_image_extension(target: &Url) -> bool {
    let path = target.path().to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn link_icon(r: &Reference, _: &Url) -> bool {
    r.is("link") && r.rel_contains("icon")
}

fn link_stylesheet(r: &Reference, _: &Url) -> bool {
    r.is("link") && r.rel_contains("stylesheet")
}

fn link_preload_script(r: &Reference, _: &Url) -> bool {
    r.is("link")
        && r.preload_as
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("script"))
}

fn link_image(r: &Reference, target: &Url) -> bool {
    r.is("link") && has_image_extension(target)
}

fn is_link(r: &Reference, _: &Url) -> bool {
    r.is("link")
}

fn image_target(_: &Reference, target: &Url) -> bool {
    has_image_extension(target)
}

fn always(_: &Reference, _: &Url) -> bool {
    true
}

fn meta_url(r: &Reference, _: &Url) -> bool {
    if !r.is("meta") {
        return false;
    }
    let value = r.value.trim_start().to_ascii_lowercase();
    value.starts_with("http://") || value.starts_with("https://") || value.starts_with("//")
}

fn script_js(r: &Reference, _: &Url) -> bool {
    r.is("script") && r.value.to_ascii_lowercase().contains("js")
}

fn script_async(r: &Reference, _: &Url) -> bool {
    r.is("script") && r.is_async
}
