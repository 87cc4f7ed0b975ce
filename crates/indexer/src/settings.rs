//! Configuration loading: optional TOML file overlaid with `CHUNKDEX_` variables.

use chunkdex_core::config::AppConfig;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::path::Path;

/// Environment variable prefix; `__` separates nested keys.
pub const ENV_PREFIX: &str = "CHUNKDEX_";

/// Variable naming the config file itself, not a setting.
pub const CONFIG_PATH_ENV: &str = "CHUNKDEX_CONFIG";

/// Assemble the configuration sources. The file is skipped when absent.
pub fn figment(config_path: &Path) -> Figment {
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %config_path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(config_path));
    } else {
        tracing::debug!("No config file found at {}", config_path.display());
    }
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Whether any setting is provided through the environment.
pub fn has_env_config() -> bool {
    std::env::vars().any(|(key, _)| key.starts_with(ENV_PREFIX) && key != CONFIG_PATH_ENV)
}

pub fn load(config_path: &Path) -> Result<AppConfig, figment::Error> {
    figment(config_path).extract()
}
