use once_cell::sync::Lazy;
use regex::bytes::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// Remove every `<...>` sequence, keeping the text in between.
///
/// Works on raw bytes so bodies that are not valid UTF-8 are still served.
pub fn strip_markup(body: &[u8]) -> Vec<u8> {
    TAG.replace_all(body, &b""[..]).into_owned()
}
