use crate::rewrite::RewriteError;
use lol_html::html_content::Element;

/// Minimal view of a markup element needed by the rewriter.
///
/// Keeps the rewriting rules independent of the markup library so they can be
/// exercised without a parser.
pub trait ElementHandle {
    fn tag(&self) -> String;

    /// Attribute value with character references decoded.
    fn attr(&self, name: &str) -> Option<String>;

    fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    fn set_attr(&mut self, name: &str, value: &str) -> Result<(), RewriteError>;
}

impl ElementHandle for Element<'_, '_> {
    fn tag(&self) -> String {
        self.tag_name()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
            .map(|raw| html_escape::decode_html_entities(&raw).into_owned())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.has_attribute(name)
    }

    fn set_attr(&mut self, name: &str, value: &str) -> Result<(), RewriteError> {
        self.set_attribute(name, value)
            .map_err(|e| RewriteError::Attribute {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}
