use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{ResolverConfig, TIMEOUT_ENV, TOKEN_ENV};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticConfig {
    #[serde(default)]
    http_timeout_secs: Option<u64>,
}

/// Loads a static YAML config file (no secrets) and injects the token and
/// timeout override from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ResolverConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let mut config = load_env_config()?;
    if config.http_timeout_secs.is_none() {
        config.http_timeout_secs = static_conf.http_timeout_secs;
    }
    config.trace_loaded();
    Ok(config)
}

/// Builds a config from the environment alone.
///
/// The token is optional because public repositories need none; an
/// unparseable timeout is an error.
pub fn load_env_config() -> Result<ResolverConfig> {
    let token = match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => {
            info!("{TOKEN_ENV} found in env");
            Some(token)
        }
        _ => None,
    };

    let http_timeout_secs = match std::env::var(TIMEOUT_ENV) {
        Ok(var) => match var.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                error!(error = ?e, var = ?var, "{TIMEOUT_ENV} must be a whole number of seconds");
                anyhow::bail!("{TIMEOUT_ENV} must be a whole number of seconds: {e}");
            }
        },
        Err(_) => None,
    };

    Ok(ResolverConfig {
        http_timeout_secs,
        token,
    })
}
