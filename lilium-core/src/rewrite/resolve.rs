use std::borrow::Cow;
use thiserror::Error;
use url::{ParseError, Url};

/// How absolute `http` URLs are treated before they are fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemePolicy {
    /// Rewrite `http://` to `https://` (prefer an encrypted upstream).
    #[default]
    UpgradeInsecure,

    /// Keep the scheme exactly as written.
    Preserve,
}

impl SchemePolicy {
    pub fn from_upgrade_flag(upgrade_insecure: bool) -> Self {
        if upgrade_insecure {
            SchemePolicy::UpgradeInsecure
        } else {
            SchemePolicy::Preserve
        }
    }

    fn apply(self, url: &mut Url) {
        if self == SchemePolicy::UpgradeInsecure && url.scheme() == "http" {
            // http -> https is always a permitted special-scheme change.
            let _ = url.set_scheme("https");
        }
    }
}

/// Outcome of resolving one raw reference against its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Url),
    Unresolved(ParseError),
}

/// Resolve `raw` against `base`.
///
/// Absolute references only have their scheme normalized by `policy`. Relative
/// references follow RFC 3986 reference resolution and inherit the base's
/// scheme. A reference that cannot be parsed at all is reported as
/// [`Resolution::Unresolved`] so the caller can leave it as it was.
pub fn resolve(raw: &str, base: &Url, policy: SchemePolicy) -> Resolution {
    let raw = raw.trim();

    match Url::parse(raw) {
        Ok(mut absolute) => {
            policy.apply(&mut absolute);
            Resolution::Resolved(absolute)
        }
        Err(ParseError::RelativeUrlWithoutBase) => match base.join(raw) {
            Ok(resolved) => Resolution::Resolved(resolved),
            Err(err) => Resolution::Unresolved(err),
        },
        Err(err) => Resolution::Unresolved(err),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("missing 'url' parameter")]
    Missing,

    #[error("invalid 'url' parameter '{raw}': {source}")]
    Invalid {
        raw: String,
        #[source]
        source: ParseError,
    },

    #[error("unsupported scheme '{scheme}' in 'url' parameter")]
    UnsupportedScheme { scheme: String },

    #[error("'url' parameter '{raw}' has no host")]
    MissingHost { raw: String },
}

/// Parse the `url=` parameter of the render and passthrough endpoints.
///
/// Values written without a scheme (`example.com/page`) are fetched over https.
pub fn parse_target(raw: &str, policy: SchemePolicy) -> Result<Url, TargetError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TargetError::Missing);
    }

    let candidate = if has_explicit_scheme(raw) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("https://{raw}"))
    };

    let mut target = Url::parse(&candidate).map_err(|source| TargetError::Invalid {
        raw: raw.to_string(),
        source,
    })?;
    policy.apply(&mut target);

    if !matches!(target.scheme(), "http" | "https") {
        return Err(TargetError::UnsupportedScheme {
            scheme: target.scheme().to_string(),
        });
    }

    if target.host_str().is_none_or(str::is_empty) {
        return Err(TargetError::MissingHost {
            raw: raw.to_string(),
        });
    }

    Ok(target)
}

fn has_explicit_scheme(raw: &str) -> bool {
    match raw.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
