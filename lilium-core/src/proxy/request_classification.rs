use crate::rewrite::RouteKind;
use http::{Method, Uri};
use pingora_http::RequestHeader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// `/render` or `/passthrough` (and their legacy aliases).
    Route(RouteKind),

    /// The landing form submitted with a method other than GET or HEAD, on
    /// any non-endpoint path.
    FormSubmit,

    /// Anything else is served from the embedded landing assets.
    Landing { path: String },
}

pub fn classify_request(req: &RequestHeader) -> RequestKind {
    let path = req.uri.path();

    if let Some(route) = RouteKind::from_path(path) {
        return RequestKind::Route(route);
    }

    if !matches!(req.method, Method::GET | Method::HEAD) {
        return RequestKind::FormSubmit;
    }

    RequestKind::Landing {
        path: path.to_string(),
    }
}

/// First value of query parameter `name`, percent-decoded.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
