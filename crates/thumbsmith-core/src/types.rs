//! Core data types for the Thumbsmith pipeline.

use serde::{Deserialize, Serialize};

/// One source image waiting to be resized.
///
/// Created by the fetch stage after a successful download; consumed (and
/// its backing file deleted) by exactly one resize worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTask {
    /// Filename under the incoming directory, derived from the URL's
    /// final path segment.
    pub filename: String,
}

impl ImageTask {
    /// Create a task for a stored incoming file.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// Outcome of running the fetch stage over a URL list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchReport {
    /// URLs attempted
    pub attempted: usize,

    /// Downloads that persisted and were enqueued
    pub succeeded: usize,

    /// Downloads that failed (logged, skipped)
    pub failed: usize,
}

/// Aggregated result of a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total URLs supplied
    pub urls_total: usize,

    /// Images downloaded into the incoming directory
    pub fetched: usize,

    /// URLs that failed to download
    pub fetch_failed: usize,

    /// Bytes written by the fetch stage
    pub downloaded_bytes: u64,

    /// Bytes written by the resize stage across all variants
    pub produced_bytes: u64,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}
