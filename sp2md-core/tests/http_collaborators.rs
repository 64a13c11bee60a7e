use std::fs;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use sp2md_core::contract::{AssetFetcher, PostSource};
use sp2md_core::convert::HtmlConverter;
use sp2md_core::fetch::HttpAssetFetcher;
use sp2md_core::http::{Credentials, HttpSettings};
use sp2md_core::sharepoint::SharePointClient;
use sp2md_core::{run, ExportError, FetchError, PostExporter};
use tempfile::tempdir;

fn settings(credentials: Credentials) -> HttpSettings {
    HttpSettings {
        timeout: Duration::from_secs(5),
        credentials,
    }
}

#[tokio::test]
async fn sharepoint_client_follows_next_link() {
    let server = MockServer::start();
    let next = server.url("/_api/web/lists/GetByTitle('Posts')/items?$skiptoken=2");

    let first = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/_api/web/lists/GetByTitle")
            .query_param_exists("$top")
            .header("Authorization", "Bearer secret");
        then.status(200).json_body(json!({
            "value": [{
                "ID": 1,
                "Title": "First",
                "Body": "<p>one</p>",
                "Created": "2024-01-01T00:00:00Z",
                "Author": { "Title": "Jane" },
                "PostCategory": [{ "Title": "News" }]
            }],
            "odata.nextLink": next
        }));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/_api/web/lists/GetByTitle")
            .query_param("$skiptoken", "2");
        then.status(200).json_body(json!({
            "value": [{ "ID": 2, "Title": "Second", "Author": { "Title": "Sam" } }]
        }));
    });

    let client = SharePointClient::new(
        &server.base_url(),
        "Posts",
        &settings(Credentials::Bearer {
            token: "secret".to_string(),
        }),
    )
    .unwrap();
    let posts = client.fetch_posts().await.unwrap();

    first.assert();
    second.assert();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "First");
    assert_eq!(posts[0].categories, vec!["News"]);
    assert_eq!(posts[1].author, "Sam");
    assert!(posts[1].categories.is_empty());
    assert_eq!(posts[1].body, "");
}

#[tokio::test]
async fn sharepoint_error_status_is_a_connection_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path_contains("/_api/web/lists/GetByTitle");
        then.status(404).body("List 'Posts' does not exist");
    });

    let client =
        SharePointClient::new(&server.base_url(), "Posts", &settings(Credentials::None)).unwrap();
    let result = client.fetch_posts().await;

    assert!(matches!(result, Err(ExportError::Connection { .. })));
}

#[tokio::test]
async fn unreachable_site_is_a_connection_error() {
    let client = SharePointClient::new(
        "http://127.0.0.1:9",
        "Posts",
        &settings(Credentials::None),
    )
    .unwrap();
    let result = client.fetch_posts().await;
    assert!(matches!(result, Err(ExportError::Connection { .. })));
}

#[tokio::test]
async fn asset_fetcher_sends_basic_auth_and_returns_bytes() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/sites/blog/pic.png")
            .header("Authorization", "Basic dXNlcjpwYXNz");
        then.status(200).body([0x89u8, b'P', b'N', b'G']);
    });

    let fetcher = HttpAssetFetcher::new(&settings(Credentials::Basic {
        username: "user".to_string(),
        password: Some("pass".to_string()),
    }))
    .unwrap();
    let bytes = fetcher.fetch(&server.url("/sites/blog/pic.png")).await.unwrap();

    mock.assert();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn asset_fetcher_reports_status_and_bad_urls() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing.png");
        then.status(404);
    });
    let fetcher = HttpAssetFetcher::new(&settings(Credentials::None)).unwrap();

    let missing = fetcher.fetch(&server.url("/missing.png")).await;
    assert!(matches!(missing, Err(FetchError::Status { status: 404, .. })));

    let malformed = fetcher.fetch("not a url").await;
    assert!(matches!(malformed, Err(FetchError::Transport { .. })));
}

#[tokio::test]
async fn end_to_end_against_a_fake_site() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path_contains("/_api/web/lists/GetByTitle");
        then.status(200).json_body(json!({
            "value": [
                {
                    "ID": 1,
                    "Title": "Team Offsite",
                    "Body": "<p>Photos:</p><img src=\"/sites/blog/SiteAssets/group.jpg\" alt=\"group\"><img src=\"/sites/blog/SiteAssets/lost.jpg\">",
                    "Created": "2023-09-12T08:00:00Z",
                    "Author": { "Title": "Jane Doe" },
                    "PostCategory": [{ "Title": "Team" }, { "Title": "Events" }]
                },
                {
                    "ID": 2,
                    "Title": "Plain post",
                    "Body": "<p>No pictures here.</p>",
                    "Created": "2023-09-13T08:00:00Z",
                    "Author": { "Title": "Sam" },
                    "PostCategory": []
                }
            ]
        }));
    });
    let group = server.mock(|when, then| {
        when.method(GET).path("/sites/blog/SiteAssets/group.jpg");
        then.status(200).body("jpeg-bytes");
    });
    server.mock(|when, then| {
        when.method(GET).path("/sites/blog/SiteAssets/lost.jpg");
        then.status(500);
    });

    let tmp = tempdir().unwrap();
    let out = tmp.path().join("exports");
    let http = settings(Credentials::None);
    let source = SharePointClient::new(&server.base_url(), "Posts", &http).unwrap();
    let exporter = PostExporter::new(
        &server.base_url(),
        &out,
        HttpAssetFetcher::new(&http).unwrap(),
        http.timeout,
    );

    let report = run(&source, &HtmlConverter::new(), &exporter).await.unwrap();

    group.assert();
    assert_eq!(report.posts.len(), 2);
    assert_eq!(report.assets_saved(), 1);
    assert_eq!(report.assets_failed(), 1);

    let offsite = fs::read_to_string(out.join("TeamOffsite.md")).unwrap();
    assert!(offsite.contains("\ntags: Team, Events\n"));
    assert!(offsite.contains("![group](/group.jpg)"));
    assert!(offsite.contains("![](/lost.jpg)"));
    assert_eq!(fs::read(out.join("group.jpg")).unwrap(), b"jpeg-bytes");
    assert!(!out.join("lost.jpg").exists());

    let plain = fs::read_to_string(out.join("Plainpost.md")).unwrap();
    assert!(plain.contains("\ntags: \n"));
    assert!(plain.ends_with("---\nNo pictures here.\n"));
}
