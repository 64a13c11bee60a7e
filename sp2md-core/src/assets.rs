//! Downloads the assets a post references into the export directory.
//!
//! Each reference goes `Pending -> Downloading -> Saved | Failed`. A failed
//! download is recorded and the next reference is tried; only a failure to
//! write into the export directory stops the run.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::contract::AssetFetcher;
use crate::error::{ExportError, FetchError};
use crate::export_dir::ExportDirectory;
use crate::rewrite::AssetReference;

/// Terminal state of one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Saved { path: PathBuf, bytes: usize },
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResult {
    pub reference: AssetReference,
    pub outcome: AssetOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetReport {
    /// The post referenced nothing on the site; no request was made.
    NoContent,
    Fetched(Vec<AssetResult>),
}

impl AssetReport {
    pub fn results(&self) -> &[AssetResult] {
        match self {
            AssetReport::NoContent => &[],
            AssetReport::Fetched(results) => results,
        }
    }

    pub fn saved(&self) -> usize {
        self.results()
            .iter()
            .filter(|r| matches!(r.outcome, AssetOutcome::Saved { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results().len() - self.saved()
    }
}

pub struct AssetFetchCoordinator<F> {
    fetcher: F,
    dir: ExportDirectory,
    timeout: Duration,
}

impl<F> AssetFetchCoordinator<F>
where
    F: AssetFetcher,
{
    pub fn new(fetcher: F, dir: ExportDirectory, timeout: Duration) -> Self {
        Self {
            fetcher,
            dir,
            timeout,
        }
    }

    /// Fetches every reference in order, one at a time.
    pub async fn fetch_all(&self, references: &[AssetReference]) -> Result<AssetReport, ExportError> {
        if references.is_empty() {
            info!("No content found");
            return Ok(AssetReport::NoContent);
        }

        let mut results = Vec::with_capacity(references.len());
        for reference in references {
            let outcome = self.fetch_one(reference).await?;
            results.push(AssetResult {
                reference: reference.clone(),
                outcome,
            });
        }
        Ok(AssetReport::Fetched(results))
    }

    async fn fetch_one(&self, reference: &AssetReference) -> Result<AssetOutcome, ExportError> {
        let url = reference.resolved_download_url.as_str();
        info!(name = %reference.local_name, url = %url, "Content found, downloading");

        let fetched = match tokio::time::timeout(self.timeout, self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }),
        };

        match fetched {
            Ok(bytes) => {
                let path = self.dir.write_asset(&reference.local_name, &bytes)?;
                info!(
                    name = %reference.local_name,
                    path = %path.display(),
                    bytes = bytes.len(),
                    "Downloaded asset"
                );
                Ok(AssetOutcome::Saved {
                    path,
                    bytes: bytes.len(),
                })
            }
            Err(e) => {
                warn!(name = %reference.local_name, error = %e, "Asset download failed");
                Ok(AssetOutcome::Failed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MockAssetFetcher;
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn reference(path: &str, name: &str) -> AssetReference {
        AssetReference {
            original_path: path.into(),
            local_name: name.into(),
            resolved_download_url: format!("https://s.example{path}"),
        }
    }

    #[tokio::test]
    async fn empty_reference_list_makes_no_requests() {
        let tmp = tempdir().unwrap();
        let mut fetcher = MockAssetFetcher::new();
        fetcher.expect_fetch().never();

        let coordinator = AssetFetchCoordinator::new(
            fetcher,
            ExportDirectory::new(tmp.path()),
            Duration::from_secs(5),
        );
        let report = coordinator.fetch_all(&[]).await.unwrap();
        assert_eq!(report, AssetReport::NoContent);
        assert_eq!(report.saved(), 0);
    }

    #[tokio::test]
    async fn failure_does_not_stop_the_next_asset() {
        let tmp = tempdir().unwrap();
        let mut fetcher = MockAssetFetcher::new();
        fetcher
            .expect_fetch()
            .with(eq("https://s.example/a/missing.png"))
            .times(1)
            .returning(|url| {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            });
        fetcher
            .expect_fetch()
            .with(eq("https://s.example/a/ok.png"))
            .times(1)
            .returning(|_| Ok(b"png-bytes".to_vec()));

        let coordinator = AssetFetchCoordinator::new(
            fetcher,
            ExportDirectory::new(tmp.path()),
            Duration::from_secs(5),
        );
        let report = coordinator
            .fetch_all(&[
                reference("/a/missing.png", "missing.png"),
                reference("/a/ok.png", "ok.png"),
            ])
            .await
            .unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.saved(), 1);
        assert!(matches!(
            report.results()[0].outcome,
            AssetOutcome::Failed(FetchError::Status { status: 404, .. })
        ));
        assert!(!tmp.path().join("missing.png").exists());
        assert_eq!(
            std::fs::read(tmp.path().join("ok.png")).unwrap(),
            b"png-bytes"
        );
    }

    struct SlowFetcher;

    #[async_trait::async_trait]
    impl AssetFetcher for SlowFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn slow_fetch_times_out_as_failed() {
        let tmp = tempdir().unwrap();
        let coordinator = AssetFetchCoordinator::new(
            SlowFetcher,
            ExportDirectory::new(tmp.path()),
            Duration::from_millis(20),
        );
        let report = coordinator
            .fetch_all(&[reference("/slow.png", "slow.png")])
            .await
            .unwrap();
        assert!(matches!(
            report.results()[0].outcome,
            AssetOutcome::Failed(FetchError::Timeout { .. })
        ));
    }
}
