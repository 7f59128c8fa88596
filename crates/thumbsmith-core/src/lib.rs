//! Thumbsmith Core - Concurrent thumbnail pipeline library.
//!
//! Thumbsmith turns a list of remote image URLs into locally stored
//! thumbnails at several fixed widths. The network-bound fetch stage is
//! decoupled from the CPU-bound resize stage by a thread-safe transfer
//! queue; a fixed pool of worker threads drains the queue and shuts
//! down deterministically via one shutdown sentinel per worker.
//!
//! # Architecture
//!
//! ```text
//! URLs → Fetch (bounded async) → TransferQueue → Resize workers → outgoing/
//!                  │                                    │
//!                  └────────── Metrics (bytes) ─────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use thumbsmith_core::{Config, ThumbnailService};
//!
//! #[tokio::main]
//! async fn main() -> thumbsmith_core::Result<()> {
//!     let config = Config::load()?;
//!     let service = ThumbnailService::new(config);
//!
//!     let summary = service.run(&urls).await?;
//!     println!("downloaded {} bytes", summary.downloaded_bytes);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod queue;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, Result, ThumbsmithError};
pub use metrics::{Metrics, MetricsSnapshot, SizeCounter};
pub use pipeline::{FetchStage, Resizer, ResizeWorkerPool, ThumbnailService};
pub use queue::{QueueEntry, TransferQueue};
pub use types::{FetchReport, ImageTask, RunSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
