//! Pipeline orchestration: fetch everything, resize as available, drain.

use std::time::Instant;

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::metrics::Metrics;
use crate::queue::{QueueEntry, TransferQueue};
use crate::types::RunSummary;

use super::fetch::FetchStage;
use super::resize::Resizer;
use super::worker::ResizeWorkerPool;

/// The end-to-end thumbnail pipeline.
///
/// Owns the run sequence: create the working directories, start the
/// resize pool, run the fetch stage to completion, inject one shutdown
/// sentinel per worker, wait for the drain, and report totals.
pub struct ThumbnailService {
    config: Config,
    fetch: FetchStage,
}

impl ThumbnailService {
    /// Create a service from configuration.
    pub fn new(config: Config) -> Self {
        let fetch = FetchStage::new(&config.fetch);
        Self { config, fetch }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline over `urls`.
    ///
    /// Per-URL and per-image failures are logged and absorbed; only
    /// workspace setup failures and queue-protocol violations return an
    /// error.
    pub async fn run(&self, urls: &[String]) -> Result<RunSummary> {
        let start = Instant::now();

        let incoming = self.config.incoming_dir();
        let outgoing = self.config.outgoing_dir();
        std::fs::create_dir_all(&incoming)?;
        std::fs::create_dir_all(&outgoing)?;

        let metrics = Metrics::new();
        let queue = TransferQueue::new();
        let workers = self.config.resize.effective_workers();

        // Workers start first so resizing begins as soon as the first
        // download lands.
        let pool = ResizeWorkerPool::spawn(
            workers,
            queue.clone(),
            Resizer::new(self.config.resize.target_widths.clone()),
            incoming.clone(),
            outgoing.clone(),
            metrics.clone(),
        )?;

        tracing::info!(
            "Fetching {} image(s) ({} download slots, {} resize workers)",
            urls.len(),
            self.config.fetch.workers,
            workers
        );
        let report = self.fetch.run(urls, &incoming, &queue, &metrics).await;

        // The fetch stage has returned: every real work item is queued.
        // Exactly one sentinel per worker ends the pool.
        for _ in 0..workers {
            queue.push(QueueEntry::Shutdown);
        }

        let drain = {
            let queue = queue.clone();
            tokio::task::spawn_blocking(move || {
                queue.join();
                pool.join()
            })
        };
        drain
            .await
            .map_err(|e| PipelineError::QueueProtocol {
                message: format!("worker pool join failed: {e}"),
            })??;

        let snapshot = metrics.snapshot();
        let summary = RunSummary {
            urls_total: urls.len(),
            fetched: report.succeeded,
            fetch_failed: report.failed,
            downloaded_bytes: snapshot.downloaded_bytes,
            produced_bytes: snapshot.produced_bytes,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            "Pipeline finished: {}/{} fetched, {} bytes down, {} bytes produced in {}ms",
            summary.fetched,
            summary.urls_total,
            summary.downloaded_bytes,
            summary.produced_bytes,
            summary.elapsed_ms
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn service_with_home(home: PathBuf) -> ThumbnailService {
        let mut config = Config::default();
        config.general.home_dir = home;
        config.resize.workers = 2;
        ThumbnailService::new(config)
    }

    #[tokio::test]
    async fn test_empty_url_list_creates_dirs_and_reports_zero() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_home(dir.path().join("home"));

        let summary = service.run(&[]).await.unwrap();
        assert_eq!(summary.urls_total, 0);
        assert_eq!(summary.fetched, 0);
        assert_eq!(summary.downloaded_bytes, 0);
        assert_eq!(summary.produced_bytes, 0);
        assert!(service.config().incoming_dir().exists());
        assert!(service.config().outgoing_dir().exists());
    }

    #[tokio::test]
    async fn test_unreachable_urls_absorbed_as_failures() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_home(dir.path().join("home"));

        let urls = vec![
            "http://127.0.0.1:1/a.jpg".to_string(),
            "http://127.0.0.1:1/b.jpg".to_string(),
        ];
        let summary = service.run(&urls).await.unwrap();
        assert_eq!(summary.urls_total, 2);
        assert_eq!(summary.fetched, 0);
        assert_eq!(summary.fetch_failed, 2);
        assert_eq!(summary.downloaded_bytes, 0);
    }
}
