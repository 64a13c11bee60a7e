//! SharePoint REST client for the blog "Posts" list.
//!
//! Queries `/_api/web/lists/GetByTitle('<list>')/items` for every item with
//! `ID >= 0`, expanding the author and category lookups to their display
//! values, and follows `odata.nextLink` until the list is exhausted.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::contract::{PostSource, RawPost};
use crate::error::ExportError;
use crate::http::{Credentials, HttpSettings};

pub const DEFAULT_LIST_TITLE: &str = "Posts";

const SELECT: &str = "ID,Title,Body,Created,Author/Title,PostCategory/Title";
const EXPAND: &str = "Author,PostCategory";
const PAGE_SIZE: &str = "5000";

pub struct SharePointClient {
    client: Client,
    credentials: Credentials,
    site_url: String,
    list_title: String,
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
    #[serde(default)]
    value: Vec<ListItem>,
    #[serde(rename = "odata.nextLink", alias = "@odata.nextLink", default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListItem {
    #[serde(rename = "ID", default)]
    id: Option<i64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    author: Option<Lookup>,
    #[serde(default)]
    post_category: Option<Vec<Lookup>>,
}

#[derive(Debug, Deserialize)]
struct Lookup {
    #[serde(rename = "Title", default)]
    title: Option<String>,
}

impl From<ListItem> for RawPost {
    fn from(item: ListItem) -> Self {
        RawPost {
            title: item.title.unwrap_or_default(),
            body: item.body.unwrap_or_default(),
            author: item.author.and_then(|a| a.title).unwrap_or_default(),
            categories: item
                .post_category
                .unwrap_or_default()
                .into_iter()
                .filter_map(|c| c.title)
                .collect(),
            created: item.created.unwrap_or_default(),
        }
    }
}

impl SharePointClient {
    pub fn new(site_url: &str, list_title: &str, settings: &HttpSettings) -> Result<Self, ExportError> {
        let site_url = site_url.trim().trim_end_matches('/');
        if !(site_url.starts_with("http://") || site_url.starts_with("https://")) {
            error!(site_url = %site_url, "Site URL must start with http:// or https://");
            return Err(ExportError::connection(format!(
                "invalid site URL {site_url:?}: expected http:// or https://"
            )));
        }
        Ok(Self {
            client: settings.build_client()?,
            credentials: settings.credentials.clone(),
            site_url: site_url.to_string(),
            list_title: list_title.to_string(),
        })
    }

    fn items_url(&self) -> String {
        format!(
            "{}/_api/web/lists/GetByTitle('{}')/items",
            self.site_url,
            self.list_title.replace('\'', "''")
        )
    }

    async fn fetch_page(&self, url: &str, first: bool) -> Result<ItemsPage, ExportError> {
        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json;odata=nometadata");
        if first {
            request = request.query(&[
                ("$select", SELECT),
                ("$expand", EXPAND),
                ("$filter", "ID ge 0"),
                ("$top", PAGE_SIZE),
            ]);
        }

        let response = self.credentials.apply(request).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to query SharePoint list");
            ExportError::connection(format!("query to {url} failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(status = %status, url = %url, "SharePoint returned error. Response body: {text}");
            return Err(ExportError::connection(format!(
                "{url} returned HTTP {status}"
            )));
        }

        response.json::<ItemsPage>().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to parse SharePoint list JSON");
            ExportError::connection(format!("unexpected response from {url}: {e}"))
        })
    }
}

#[async_trait]
impl PostSource for SharePointClient {
    async fn fetch_posts(&self) -> Result<Vec<RawPost>, ExportError> {
        let mut url = self.items_url();
        let mut first = true;
        let mut posts = Vec::new();

        info!(list = %self.list_title, url = %url, "Querying SharePoint list");
        loop {
            let page = self.fetch_page(&url, first).await?;
            debug!(items = page.value.len(), "Fetched list page");
            for item in page.value {
                debug!(id = ?item.id, title = ?item.title, "Got list item");
                posts.push(RawPost::from(item));
            }
            match page.next_link {
                Some(next) if next != url => {
                    url = next;
                    first = false;
                }
                _ => break,
            }
        }

        info!(count = posts.len(), list = %self.list_title, "Retrieved posts");
        Ok(posts)
    }
}
