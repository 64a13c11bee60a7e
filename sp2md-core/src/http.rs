//! Shared HTTP settings for talking to the SharePoint site.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How requests to the site authenticate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Credentials {
    /// Anonymous, or whatever the network in between provides.
    #[default]
    None,
    Basic {
        username: String,
        #[serde(default)]
        password: Option<String>,
    },
    Bearer {
        token: String,
    },
}

impl Credentials {
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::None => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, password.as_deref())
            }
            Credentials::Bearer { token } => request.bearer_auth(token),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::None => "none",
            Credentials::Basic { .. } => "basic",
            Credentials::Bearer { .. } => "bearer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub credentials: Credentials,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            credentials: Credentials::None,
        }
    }
}

impl HttpSettings {
    pub fn build_client(&self) -> Result<Client, ExportError> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("sp2md/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to build HTTP client");
                ExportError::connection(format!("could not build HTTP client: {e}"))
            })
    }
}
