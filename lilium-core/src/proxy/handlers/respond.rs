use http::{StatusCode, header};
use pingora::prelude::Session;
use pingora_http::ResponseHeader;

/// Write a complete plain text response.
pub(crate) async fn send_text(
    session: &mut Session,
    status: StatusCode,
    body: &str,
) -> pingora::Result<()> {
    let mut resp = ResponseHeader::build(status, None)?;
    resp.insert_header(header::CONTENT_TYPE, "text/plain; charset=utf-8")?;
    resp.insert_header(header::CONTENT_LENGTH, body.len().to_string())?;

    session.write_response_header(Box::new(resp), false).await?;
    session
        .write_response_body(Some(body.to_owned().into()), true)
        .await?;

    Ok(())
}

/// `303 See Other` to `location`, without a body.
pub(crate) async fn send_redirect(session: &mut Session, location: &str) -> pingora::Result<()> {
    let mut resp = ResponseHeader::build(StatusCode::SEE_OTHER, None)?;
    resp.insert_header(header::LOCATION, location)?;
    resp.insert_header(header::CONTENT_LENGTH, "0")?;

    session.write_response_header(Box::new(resp), true).await?;
    Ok(())
}
