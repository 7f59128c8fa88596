//! Thumbnail pipeline components.
//!
//! The stages of the pipeline:
//! - **fetch**: download URLs into the incoming directory
//! - **resize**: produce fixed-width variants into the outgoing directory
//! - **worker**: the blocking resize worker pool
//! - **service**: orchestrates the full run

pub mod fetch;
pub mod resize;
pub mod service;
pub mod worker;

// Re-exports for convenient access
pub use fetch::{filename_from_url, FetchStage};
pub use resize::{aspect_height, variant_filename, Resizer};
pub use service::ThumbnailService;
pub use worker::ResizeWorkerPool;
