mod error;
mod loader;
#[cfg(test)]
mod tests;
pub mod types;
mod validation;

pub use error::ConfigError;
pub use loader::{CONFIG_FILE, load_config, parse_config};
pub use types::{LiliumConfig, ServerConfig, TlsConfig, UpstreamConfig};
pub use validation::validate;
