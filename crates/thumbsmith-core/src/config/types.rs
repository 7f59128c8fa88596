//! Sub-configuration structs with pipeline defaults.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Working directory holding `incoming/` and `outgoing/`
    pub home_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            home_dir: PathBuf::from("~/.thumbsmith"),
        }
    }
}

/// Download stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum downloads in flight at once
    pub workers: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { workers: 8 }
    }
}

/// Resize stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Output widths, one variant per width per image. Heights follow
    /// from the source aspect ratio.
    pub target_widths: Vec<u32>,

    /// Resize worker threads. 0 means one per available CPU.
    pub workers: usize,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            target_widths: vec![32, 64, 200],
            workers: 0,
        }
    }
}

impl ResizeConfig {
    /// Worker count with 0 resolved to the host's available parallelism.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4)
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
