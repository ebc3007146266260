use crate::rewrite::TargetError;
use http::StatusCode;
use pingora::{BError, Custom, Error as PingoraError};
use thiserror::Error as ThisError;

/// Failures that end a render or passthrough request with an error response.
///
/// The `Display` text is sent to the client as the response body.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ProxyError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("upstream {target} responded with status {status}")]
    UpstreamStatus { target: String, status: u16 },

    #[error("failed to fetch {target}: {cause}")]
    UpstreamFetch { target: String, cause: String },

    #[error("response from {target} exceeds {limit} bytes")]
    BodyTooLarge { target: String, limit: usize },
}

impl ProxyError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn fetch(target: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::UpstreamFetch {
            target: target.into(),
            cause: cause.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamStatus { .. } | Self::UpstreamFetch { .. } | Self::BodyTooLarge { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub(crate) fn as_pingora_error(&self) -> BError {
        match self {
            Self::BadRequest(_) => PingoraError::new(Custom("bad_request")),
            Self::UpstreamStatus { .. } => PingoraError::new(Custom("upstream_status")),
            Self::UpstreamFetch { .. } => PingoraError::new(Custom("upstream_fetch_failed")),
            Self::BodyTooLarge { .. } => PingoraError::new(Custom("upstream_body_too_large")),
        }
    }
}

impl From<TargetError> for ProxyError {
    fn from(err: TargetError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
