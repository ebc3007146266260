use tracing_subscriber::{EnvFilter, fmt};

/// JSON logs filtered by `RUST_LOG` (default `info`), one flattened object per
/// event.
pub fn init_normal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .init();
}

pub fn init_logging() {
    // tokio-console installs its own subscriber; only one may be global.
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        console_subscriber::init();
    } else {
        init_normal_logging();
    }
}
