use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

pub const INDEX_HTML: &str = r#"<html><head><link rel="stylesheet" href="/site.css"></head><body><a href="/about">About</a><img src="logo.png"></body></html>"#;

pub const APP_JS: &str = "<!-- generated -->var answer = 42;";

pub const LOGO_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

/// Plain HTTP/1.1 upstream answering a fixed set of paths.
///
/// | path            | response                                   |
/// |-----------------|--------------------------------------------|
/// | `/index.html`   | 200 html with a link and an image          |
/// | `/app.js`       | 200 script wrapped in a comment            |
/// | `/logo.png`     | 200 binary png bytes                       |
/// | `/redirect`     | 302 to `/index.html`                       |
/// | `/echo-headers` | 200 text, one `name: value` line per header |
/// | anything else   | 404                                        |
pub struct ScriptedUpstream {
    port: u16,
}

impl ScriptedUpstream {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind upstream");
        let port = listener.local_addr().unwrap().port();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                thread::spawn(move || handle(stream));
            }
        });

        Self { port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Absolute URL of `path` on this upstream.
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

fn handle(mut stream: TcpStream) {
    let Some((path, headers)) = read_request(&stream) else {
        return;
    };

    let path = path.split('?').next().unwrap_or_default();

    let response = match path {
        "/index.html" => respond(200, "text/html", &[], INDEX_HTML.as_bytes()),
        "/app.js" => respond(200, "application/javascript", &[], APP_JS.as_bytes()),
        "/logo.png" => respond(200, "image/png", &[], LOGO_PNG),
        "/redirect" => respond(302, "text/html", &[("Location", "/index.html")], b""),
        "/echo-headers" => {
            let body = headers
                .iter()
                .map(|(name, value)| format!("{name}: {value}\n"))
                .collect::<String>();
            respond(200, "text/plain", &[], body.as_bytes())
        }
        _ => respond(404, "text/plain", &[], b"not here"),
    };

    let _ = stream.write_all(&response);
    let _ = stream.flush();
}

/// Request path and lowercased headers, or `None` if the client went away.
fn read_request(stream: &TcpStream) -> Option<(String, Vec<(String, String)>)> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let path = request_line.split_whitespace().nth(1)?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    Some((path, headers))
}

fn respond(status: u16, content_type: &str, extra: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let reason = match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        _ => "Unknown",
    };

    let mut head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for (name, value) in extra {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");

    let mut out = head.into_bytes();
    out.extend_from_slice(body);
    out
}
