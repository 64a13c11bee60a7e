//! Orchestration: one post at a time through rewrite, assembly, write, and
//! asset download.
//!
//! # Ordering
//! The body is rewritten before the document is assembled, so what lands on
//! disk already points at local files. The markdown file is written before any
//! asset is requested, so a failed download never costs the post its text.
//!
//! # Errors
//! Asset download failures are recorded in the [`PostReport`] and the run
//! goes on. [`ExportError`]s (unreachable site, unwritable export directory)
//! stop the run before the next post.
//!
//! # Stopping
//! A stop token set from outside (e.g. on Ctrl-C) is checked between posts;
//! the post in flight is always finished.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::assets::{AssetFetchCoordinator, AssetReport};
use crate::contract::{AssetFetcher, MarkupConverter, PostSource};
use crate::document::ExportDocument;
use crate::error::ExportError;
use crate::export_dir::ExportDirectory;
use crate::post::PostRecord;
use crate::rewrite::UrlRewriter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReport {
    /// 1-based position in the run.
    pub position: usize,
    pub title: String,
    /// The markdown file the post was appended to.
    pub path: PathBuf,
    pub assets: AssetReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub posts: Vec<PostReport>,
    /// True when the run was stopped before every post was exported.
    pub aborted: bool,
}

impl ExportReport {
    pub fn assets_saved(&self) -> usize {
        self.posts.iter().map(|p| p.assets.saved()).sum()
    }

    pub fn assets_failed(&self) -> usize {
        self.posts.iter().map(|p| p.assets.failed()).sum()
    }
}

pub struct PostExporter<F> {
    rewriter: UrlRewriter,
    dir: ExportDirectory,
    assets: AssetFetchCoordinator<F>,
    stop: Option<Arc<AtomicBool>>,
}

impl<F> PostExporter<F>
where
    F: AssetFetcher,
{
    pub fn new(site_url: &str, export_dir: impl Into<PathBuf>, fetcher: F, timeout: Duration) -> Self {
        let dir = ExportDirectory::new(export_dir);
        Self {
            rewriter: UrlRewriter::new(site_url),
            assets: AssetFetchCoordinator::new(fetcher, dir.clone(), timeout),
            dir,
            stop: None,
        }
    }

    /// Stop before the next post once `token` is set.
    pub fn with_stop_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.stop = Some(token);
        self
    }

    pub fn export_dir(&self) -> &Path {
        self.dir.path()
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Relaxed))
    }

    /// Exports one post. `position` (1-based) names the file when the title
    /// strips down to nothing.
    pub async fn export_post(&self, post: &PostRecord, position: usize) -> Result<PostReport, ExportError> {
        info!(position, title = %post.title, "Got post");

        let rewritten = self.rewriter.rewrite(&post.body);
        let doc = ExportDocument::for_post(post, &rewritten.body, &format!("post_{position}"));
        if doc.fallback_name {
            warn!(title = %post.title, filename = %doc.filename, "Title has no usable characters, using fallback filename");
        }

        let path = self.dir.append_document(&doc)?;
        info!(path = %path.display(), "Wrote post body to the markdown file");

        let assets = self.assets.fetch_all(&rewritten.references).await?;

        Ok(PostReport {
            position,
            title: post.title.clone(),
            path,
            assets,
        })
    }

    /// Exports every post in order.
    pub async fn export_all(&self, posts: &[PostRecord]) -> Result<ExportReport, ExportError> {
        self.dir.ensure()?;

        let mut report = ExportReport::default();
        for (index, post) in posts.iter().enumerate() {
            if self.stop_requested() {
                warn!(
                    exported = report.posts.len(),
                    remaining = posts.len() - index,
                    "Stop requested, skipping remaining posts"
                );
                report.aborted = true;
                break;
            }
            match self.export_post(post, index + 1).await {
                Ok(post_report) => report.posts.push(post_report),
                Err(e) => {
                    let written: Vec<String> = report
                        .posts
                        .iter()
                        .map(|p| p.path.display().to_string())
                        .collect();
                    warn!(
                        failed_position = index + 1,
                        failed_title = %post.title,
                        written = ?written,
                        "Export aborted, posts before this one were already written"
                    );
                    return Err(e);
                }
            }
        }

        info!(
            posts = report.posts.len(),
            assets_saved = report.assets_saved(),
            assets_failed = report.assets_failed(),
            "Export finished"
        );
        Ok(report)
    }
}

/// Full run: query the source, convert every record, export them all.
pub async fn run<S, C, F>(
    source: &S,
    converter: &C,
    exporter: &PostExporter<F>,
) -> Result<ExportReport, ExportError>
where
    S: PostSource + ?Sized,
    C: MarkupConverter + ?Sized,
    F: AssetFetcher,
{
    let raw = source.fetch_posts().await?;
    let posts: Vec<PostRecord> = raw
        .iter()
        .map(|r| PostRecord::from_raw(r, converter))
        .collect();
    exporter.export_all(&posts).await
}
