use url::Url;

const TEXT_EXTENSIONS: &[&str] = &[".js", ".css"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,

    /// Scripts and stylesheets fetched through the render endpoint.
    PlainText,
}

impl ContentKind {
    /// Decided on the target path extension, ignoring case.
    pub fn for_target(target: &Url) -> Self {
        let path = target.path().to_ascii_lowercase();
        if TEXT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            ContentKind::PlainText
        } else {
            ContentKind::Html
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            ContentKind::Html => "text/html; charset=utf-8",
            ContentKind::PlainText => "text/plain; charset=utf-8",
        }
    }
}
