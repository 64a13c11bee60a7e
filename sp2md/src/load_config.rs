//! `load_config` module: reads the optional YAML config file and merges it with
//! environment secrets and command-line overrides into an [`ExportConfig`].
//!
//! Precedence, highest first: command-line flags, environment variables, the
//! YAML file, built-in defaults. Secrets are expected in the environment (or a
//! `.env` file), not in the YAML:
//!
//! - `SP2MD_TOKEN`: bearer token
//! - `SP2MD_USERNAME` / `SP2MD_PASSWORD`: basic auth
//!
//! Accepted YAML (every key optional):
//!
//! ```yaml
//! site_url: https://sharepoint.example.com/sites/blog
//! export_dir: ./exports
//! list_title: Posts
//! timeout_secs: 30
//! credentials:
//!   type: basic
//!   username: svc-export
//! ```
//!
//! All errors are `anyhow::Error` and surface at the CLI boundary.

use anyhow::Result;
use serde::Deserialize;
use sp2md_core::http::Credentials;
use sp2md_core::ExportConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const TOKEN_ENV: &str = "SP2MD_TOKEN";
pub const USERNAME_ENV: &str = "SP2MD_USERNAME";
pub const PASSWORD_ENV: &str = "SP2MD_PASSWORD";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub site_url: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub list_title: Option<String>,
    pub timeout_secs: Option<u64>,
    pub credentials: Option<Credentials>,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub site_url: Option<String>,
    pub export_dir: Option<PathBuf>,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    match serde_yaml::from_str::<Option<FileConfig>>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf.unwrap_or_default())
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Environment secrets win over whatever the file declared.
pub fn credentials_from_env(file: Option<Credentials>) -> Credentials {
    let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

    if let Some(token) = non_empty(TOKEN_ENV) {
        info!("{TOKEN_ENV} found in env, using bearer auth");
        return Credentials::Bearer { token };
    }
    if let Some(username) = non_empty(USERNAME_ENV) {
        info!(username = %username, "{USERNAME_ENV} found in env, using basic auth");
        return Credentials::Basic {
            username,
            password: non_empty(PASSWORD_ENV),
        };
    }
    match file {
        Some(Credentials::Basic { username, password }) => Credentials::Basic {
            username,
            password: password.or_else(|| non_empty(PASSWORD_ENV)),
        },
        Some(other) => other,
        None => Credentials::None,
    }
}

/// Merges file, environment and flags. `site_url` is `None` when no source
/// provided one; the caller decides whether to prompt.
pub fn merge(file: FileConfig, overrides: Overrides) -> (Option<String>, ExportConfig) {
    let site_url = overrides
        .site_url
        .or(file.site_url)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut config = ExportConfig::new(site_url.clone().unwrap_or_default());
    if let Some(dir) = overrides.export_dir.or(file.export_dir) {
        config.export_dir = dir;
    }
    if let Some(list) = file.list_title {
        config.list_title = list;
    }
    if let Some(secs) = file.timeout_secs {
        config.timeout_secs = secs;
    }
    config.credentials = credentials_from_env(file.credentials);

    (site_url, config)
}
