use ferrous_shield_domain::{CliOverrides, Config};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "ferrous-shield.toml";

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

/// File the wildcard policy is written back to: the explicit path, else the
/// first config file found, else `ferrous-shield.toml` in the working directory.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(str::to_string)
        .or_else(Config::get_config_path)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
        .into()
}
