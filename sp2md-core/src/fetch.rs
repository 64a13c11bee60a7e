use async_trait::async_trait;
use reqwest::Client;

use crate::contract::AssetFetcher;
use crate::error::{ExportError, FetchError};
use crate::http::{Credentials, HttpSettings};

/// Downloads assets with a plain GET, using the configured credentials.
pub struct HttpAssetFetcher {
    client: Client,
    credentials: Credentials,
}

impl HttpAssetFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self, ExportError> {
        Ok(Self {
            client: settings.build_client()?,
            credentials: settings.credentials.clone(),
        })
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .credentials
            .apply(self.client.get(url))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}
