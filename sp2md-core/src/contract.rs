//! # contract: seams between the export pipeline and the outside world
//!
//! The pipeline talks to three collaborators, each behind a trait so the CLI
//! can plug in real HTTP clients and the tests can plug in `mockall` mocks:
//!
//! - [`PostSource`]: the list query returning raw, unconverted post records.
//! - [`MarkupConverter`]: pure HTML to markdown conversion.
//! - [`AssetFetcher`]: a single GET returning the bytes of one asset.
//!
//! Mocks (`MockPostSource`, `MockMarkupConverter`, `MockAssetFetcher`) are
//! exported under the `test-export-mocks` feature so dependent crates can use
//! them in their own tests.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Deserialize;

use crate::error::{ExportError, FetchError};

/// One list item as returned by the source, before any markup conversion.
///
/// Lookup fields are already resolved to their display values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub title: String,
    /// Rich text (HTML) body.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub created: String,
}

/// Query for every post in the configured list, in list order.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_posts(&self) -> Result<Vec<RawPost>, ExportError>;
}

/// Converts rich text into the lightweight markup written to disk.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait MarkupConverter: Send + Sync {
    fn convert(&self, html: &str) -> String;
}

/// Downloads a single asset. One attempt, no retries.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
