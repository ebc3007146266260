use bytes::Bytes;
use http::{Method, StatusCode, header};
use pingora::prelude::Session;
use pingora_http::ResponseHeader;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct LandingAssets;

const INDEX: &str = "index.html";
const NOT_FOUND: &str = "404.html";

/// An embedded file ready to be written to the client.
#[derive(Debug, Clone)]
pub(crate) struct LandingAsset {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

impl LandingAsset {
    /// Look up the asset for a request path. Unknown paths get the embedded
    /// 404 page.
    pub fn lookup(path: &str) -> Self {
        let name = match path.trim_start_matches('/') {
            "" => INDEX,
            name => name,
        };

        if let Some(asset) = Self::embedded(name, StatusCode::OK) {
            return asset;
        }

        Self::embedded(NOT_FOUND, StatusCode::NOT_FOUND).unwrap_or_else(|| Self {
            status: StatusCode::NOT_FOUND,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: Bytes::from_static(b"not found"),
        })
    }

    fn embedded(name: &str, status: StatusCode) -> Option<Self> {
        let file = LandingAssets::get(name)?;
        let mime = mime_guess::from_path(name).first_or_octet_stream();

        Some(Self {
            status,
            content_type: mime.essence_str().to_string(),
            body: Bytes::from(file.data.into_owned()),
        })
    }
}

pub(crate) struct LandingHandler;

impl LandingHandler {
    pub(crate) async fn handle(&self, session: &mut Session, path: &str) -> pingora::Result<bool> {
        let asset = LandingAsset::lookup(path);
        let head_only = session.req_header().method == Method::HEAD;

        let mut resp = ResponseHeader::build(asset.status, None)?;
        resp.insert_header(header::CONTENT_TYPE, asset.content_type)?;
        resp.insert_header(header::CONTENT_LENGTH, asset.body.len().to_string())?;

        if head_only {
            session.write_response_header(Box::new(resp), true).await?;
        } else {
            session.write_response_header(Box::new(resp), false).await?;
            session.write_response_body(Some(asset.body), true).await?;
        }

        Ok(true)
    }
}
