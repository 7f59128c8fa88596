//! Download stage: retrieve each URL into the incoming directory.
//!
//! Downloads run with bounded concurrency over a shared HTTP client.
//! Each successful download is persisted under the URL's final path
//! segment, counted into the downloaded-bytes metric, and enqueued for
//! the resize workers. A failed URL is logged and skipped; it never
//! reaches the queue or the counter.

use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::config::FetchConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::Metrics;
use crate::queue::{QueueEntry, TransferQueue};
use crate::types::{FetchReport, ImageTask};

/// The network-bound half of the pipeline.
pub struct FetchStage {
    client: reqwest::Client,
    workers: usize,
}

impl FetchStage {
    /// Create a fetch stage with its own HTTP client.
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            workers: config.workers.max(1),
        }
    }

    /// Download every URL, persisting into `incoming` and feeding `queue`.
    ///
    /// An empty URL list is a no-op. Per-URL failures are logged with
    /// enough context to retry manually and do not abort the run.
    pub async fn run(
        &self,
        urls: &[String],
        incoming: &Path,
        queue: &TransferQueue,
        metrics: &Metrics,
    ) -> FetchReport {
        let mut report = FetchReport {
            attempted: urls.len(),
            ..Default::default()
        };
        if urls.is_empty() {
            return report;
        }

        let outcomes: Vec<(&String, PipelineResult<ImageTask>)> = futures_util::stream::iter(urls)
            .map(|url| async move {
                let outcome = self.fetch_one(url, incoming, queue, metrics).await;
                (url, outcome)
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        for (url, outcome) in outcomes {
            match outcome {
                Ok(task) => {
                    report.succeeded += 1;
                    tracing::debug!("Downloaded {} from {}", task.filename, url);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("{e}");
                }
            }
        }
        report
    }

    /// Fetch-persist-count-enqueue for one URL: the atomic unit of
    /// observable progress.
    async fn fetch_one(
        &self,
        url: &str,
        incoming: &Path,
        queue: &TransferQueue,
        metrics: &Metrics,
    ) -> PipelineResult<ImageTask> {
        let filename = filename_from_url(url).ok_or_else(|| PipelineError::Fetch {
            url: url.to_string(),
            message: "URL path has no file name".to_string(),
        })?;
        let dest = incoming.join(&filename);

        match self.store(url, &dest).await {
            Ok(stored) => {
                metrics.downloaded.add(stored);
                queue.push(QueueEntry::Task(ImageTask::new(filename.clone())));
                Ok(ImageTask::new(filename))
            }
            Err(e) => {
                // Don't leave a partial file for a worker to trip over.
                let _ = tokio::fs::remove_file(&dest).await;
                Err(e)
            }
        }
    }

    /// Stream the response body to `dest`, returning the stored byte count.
    async fn store(&self, url: &str, dest: &Path) -> PipelineResult<u64> {
        let fetch_err = |message: String| PipelineError::Fetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?
            .error_for_status()
            .map_err(|e| fetch_err(e.to_string()))?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| fetch_err(format!("create {}: {e}", dest.display())))?;
        let mut stream = response.bytes_stream();
        let mut stored: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| fetch_err(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| fetch_err(format!("write {}: {e}", dest.display())))?;
            stored += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| fetch_err(format!("flush {}: {e}", dest.display())))?;
        Ok(stored)
    }
}

/// Derive the stored filename from a URL's final path segment.
///
/// Returns `None` when the path carries no usable segment (bare host,
/// trailing slash, unparseable URL).
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("http://example.com/images/photo.jpg"),
            Some("photo.jpg".to_string())
        );
        assert_eq!(
            filename_from_url("https://example.com/a/b/c.png?width=200"),
            Some("c.png".to_string())
        );
    }

    #[test]
    fn test_filename_from_url_rejects_bare_host() {
        assert_eq!(filename_from_url("http://example.com"), None);
        assert_eq!(filename_from_url("http://example.com/"), None);
    }

    #[test]
    fn test_filename_from_url_rejects_trailing_slash() {
        assert_eq!(filename_from_url("http://example.com/images/"), None);
    }

    #[test]
    fn test_filename_from_url_rejects_garbage() {
        assert_eq!(filename_from_url("not a url"), None);
    }

    #[tokio::test]
    async fn test_run_empty_list_is_noop() {
        let stage = FetchStage::new(&FetchConfig::default());
        let queue = TransferQueue::new();
        let metrics = Metrics::new();
        let dir = tempfile::tempdir().unwrap();

        let report = stage.run(&[], dir.path(), &queue, &metrics).await;
        assert_eq!(report.attempted, 0);
        assert_eq!(report.succeeded, 0);
        assert!(queue.is_empty());
        assert_eq!(metrics.snapshot().downloaded_bytes, 0);
    }

    #[tokio::test]
    async fn test_unfetchable_url_is_counted_failed() {
        let stage = FetchStage::new(&FetchConfig::default());
        let queue = TransferQueue::new();
        let metrics = Metrics::new();
        let dir = tempfile::tempdir().unwrap();

        // Nothing listens on this port; connection is refused immediately.
        let urls = vec!["http://127.0.0.1:1/missing.jpg".to_string()];
        let report = stage.run(&urls, dir.path(), &queue, &metrics).await;

        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded, 0);
        assert!(queue.is_empty());
        assert_eq!(metrics.snapshot().downloaded_bytes, 0);
    }
}
