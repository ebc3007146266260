use crate::conf::types::LiliumConfig;
use crate::conf::validation::validate;
use crate::conf::ConfigError;
use std::fs;
use std::path::Path;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE: &str = "lilium.hcl";

/// Read, parse and validate `<root>/lilium.hcl`.
pub fn load_config(root: &Path) -> Result<LiliumConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    let source = fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;

    let config = parse_config(&path, &source)?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), listen = %config.server.listen, "config loaded");

    Ok(config)
}

pub fn parse_config(path: &Path, source: &str) -> Result<LiliumConfig, ConfigError> {
    hcl::from_str(source).map_err(|e| ConfigError::parse(path, e))
}
