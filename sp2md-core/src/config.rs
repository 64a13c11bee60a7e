use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::http::{Credentials, HttpSettings, DEFAULT_TIMEOUT};
use crate::sharepoint::DEFAULT_LIST_TITLE;

pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Everything one export run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub site_url: String,
    pub export_dir: PathBuf,
    pub list_title: String,
    /// Per-request bound for the list query and each asset download.
    pub timeout_secs: u64,
    pub credentials: Credentials,
}

impl ExportConfig {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            list_title: DEFAULT_LIST_TITLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            credentials: Credentials::None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: self.timeout(),
            credentials: self.credentials.clone(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            site_url = %self.site_url,
            export_dir = %self.export_dir.display(),
            list_title = %self.list_title,
            timeout_secs = self.timeout_secs,
            credentials = self.credentials.kind(),
            "Loaded ExportConfig"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_tool() {
        let config = ExportConfig::new("https://sp.example");
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(config.list_title, "Posts");
        assert_eq!(config.credentials, Credentials::None);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let mut config = ExportConfig::new("https://sp.example");
        config.timeout_secs = 0;
        assert_eq!(config.http_settings().timeout, Duration::from_secs(1));
    }
}
