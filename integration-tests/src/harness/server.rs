use crate::harness::{EventLog, ScriptedUpstream};
use lilium_core::conf::load_config;
use lilium_core::server::build_pingora_server;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::redirect::Policy;
use std::net::TcpStream;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Handle to a running Lilium test server and the upstream it fronts.
pub struct TestServer {
    base_url: String,
    client: Client,
    upstream: ScriptedUpstream,
    events: EventLog,
}

impl TestServer {
    /// Start a Lilium instance from a fixture config directory.
    ///
    /// The listen port is allocated dynamically and patched into the loaded
    /// config, so tests can run in parallel.
    pub fn start(fixture: &str) -> Self {
        // Tracing must be installed before the server logs anything.
        let events = EventLog::global();

        let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("config")
            .join(fixture);

        assert!(
            fixture_dir.exists(),
            "fixture config directory does not exist: {:?}",
            fixture_dir
        );

        let upstream = ScriptedUpstream::start();
        let listen_port = free_port();

        let mut cfg = load_config(&fixture_dir).expect("failed to load fixture config");
        cfg.server.listen = format!("127.0.0.1:{listen_port}");

        let server = build_pingora_server(&cfg).expect("failed to build lilium server");

        thread::spawn(move || {
            server.run_forever();
        });

        let base_url = format!("http://127.0.0.1:{listen_port}");
        wait_for_server(&base_url);

        // Redirects are asserted on, never followed.
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .redirect(Policy::none())
            .build()
            .expect("failed to build client");

        Self {
            base_url,
            client,
            upstream,
            events,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    /// `GET <endpoint>?url=<target>` with the target properly escaped.
    pub fn get_via(&self, endpoint: &str, target: &str) -> RequestBuilder {
        self.client
            .get(self.url(endpoint))
            .query(&[("url", target)])
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upstream(&self) -> &ScriptedUpstream {
        &self.upstream
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

/// Poll until the server accepts connections (or panic).
fn wait_for_server(base_url: &str) {
    let addr = base_url.strip_prefix("http://").unwrap_or(base_url);

    let deadline = Instant::now() + Duration::from_secs(5);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", base_url);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

/// Allocate a free port on localhost.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
