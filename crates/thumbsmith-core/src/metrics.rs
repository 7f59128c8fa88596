//! Concurrent byte-count aggregation.
//!
//! Both pipeline stages report sizes into shared counters: the fetch
//! stage adds each stored download, every resize worker adds each
//! variant it writes. Increments use `AtomicU64::fetch_add`, so totals
//! are exact under any number of concurrent writers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A shareable non-negative byte accumulator.
///
/// Clones share the same underlying counter.
#[derive(Debug, Clone, Default)]
pub struct SizeCounter {
    value: Arc<AtomicU64>,
}

impl SizeCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` bytes. Safe from any thread; the increment is fully
    /// applied before this returns.
    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Read the current total.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// The two pipeline counters: bytes downloaded and bytes produced.
///
/// Cheap to clone; all clones observe the same totals.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Bytes written by the fetch stage
    pub downloaded: SizeCounter,

    /// Bytes written by the resize stage
    pub produced: SizeCounter,
}

impl Metrics {
    /// Create a fresh pair of zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read both totals. Consistent once all contributing work has
    /// completed; the two counters are independent of each other.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            downloaded_bytes: self.downloaded.get(),
            produced_bytes: self.produced.get(),
        }
    }
}

/// A point-in-time read of both counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total bytes downloaded into the incoming directory
    pub downloaded_bytes: u64,

    /// Total bytes of resized variants written to the outgoing directory
    pub produced_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = SizeCounter::new();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let counter = SizeCounter::new();
        let clone = counter.clone();
        counter.add(10);
        clone.add(5);
        assert_eq!(counter.get(), 15);
        assert_eq!(clone.get(), 15);
    }

    // K concurrent writers each adding V, M times, must land on exactly
    // K * V * M. Lost updates would show up as a smaller total.
    fn hammer(k: usize) {
        const V: u64 = 7;
        const M: usize = 1000;

        let counter = SizeCounter::new();
        let handles: Vec<_> = (0..k)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..M {
                        counter.add(V);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.get(), (k as u64) * V * (M as u64));
    }

    #[test]
    fn test_concurrent_increments_1_writer() {
        hammer(1);
    }

    #[test]
    fn test_concurrent_increments_4_writers() {
        hammer(4);
    }

    #[test]
    fn test_concurrent_increments_16_writers() {
        hammer(16);
    }

    #[test]
    fn test_snapshot_reads_both_counters() {
        let metrics = Metrics::new();
        metrics.downloaded.add(100);
        metrics.produced.add(250);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.downloaded_bytes, 100);
        assert_eq!(snapshot.produced_bytes, 250);
    }
}
