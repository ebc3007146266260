use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("markup could not be rewritten: {0}")]
    Markup(#[from] lol_html::errors::RewritingError),

    #[error("attribute '{name}' could not be set: {reason}")]
    Attribute { name: String, reason: String },
}
