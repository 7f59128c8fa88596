//! Fixed-size pool of resize worker threads.
//!
//! Each worker runs an identical blocking loop against the shared
//! queue: pop, resize, mark done, repeat. A shutdown sentinel ends
//! exactly one worker, so the orchestrator must enqueue one sentinel
//! per worker after the last real item.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crate::error::{PipelineError, PipelineResult};
use crate::metrics::Metrics;
use crate::queue::{QueueEntry, TransferQueue};

use super::resize::Resizer;

/// Handle to a running set of resize workers.
pub struct ResizeWorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl ResizeWorkerPool {
    /// Start `count` worker threads consuming from `queue`.
    pub fn spawn(
        count: usize,
        queue: TransferQueue,
        resizer: Resizer,
        incoming: PathBuf,
        outgoing: PathBuf,
        metrics: Metrics,
    ) -> std::io::Result<Self> {
        let mut handles = Vec::with_capacity(count);
        for i in 0..count {
            let queue = queue.clone();
            let resizer = resizer.clone();
            let incoming = incoming.clone();
            let outgoing = outgoing.clone();
            let metrics = metrics.clone();

            let handle = std::thread::Builder::new()
                .name(format!("resize-{i}"))
                .spawn(move || worker_loop(&queue, &resizer, &incoming, &outgoing, &metrics))?;
            handles.push(handle);
        }
        tracing::debug!("Started {count} resize worker(s)");
        Ok(Self { handles })
    }

    /// Number of workers in the pool.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to reach its terminal state.
    ///
    /// A panicked worker is a broken pool: its queue share is orphaned,
    /// so this is surfaced as a fatal protocol error.
    pub fn join(self) -> PipelineResult<()> {
        for handle in self.handles {
            let name = handle
                .thread()
                .name()
                .unwrap_or("resize-worker")
                .to_string();
            handle.join().map_err(|_| PipelineError::QueueProtocol {
                message: format!("worker {name} panicked before shutdown"),
            })?;
        }
        Ok(())
    }
}

fn worker_loop(
    queue: &TransferQueue,
    resizer: &Resizer,
    incoming: &Path,
    outgoing: &Path,
    metrics: &Metrics,
) {
    loop {
        match queue.pop() {
            QueueEntry::Shutdown => {
                queue.task_done();
                tracing::debug!("Resize worker received shutdown");
                break;
            }
            QueueEntry::Task(task) => {
                resizer.process(incoming, outgoing, &task, metrics);
                queue.task_done();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageTask;
    use image::DynamicImage;
    use std::sync::mpsc;
    use std::time::Duration;

    fn spawn_pool(count: usize, queue: &TransferQueue) -> (ResizeWorkerPool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming");
        let outgoing = dir.path().join("outgoing");
        std::fs::create_dir_all(&incoming).unwrap();
        std::fs::create_dir_all(&outgoing).unwrap();

        let pool = ResizeWorkerPool::spawn(
            count,
            queue.clone(),
            Resizer::new(vec![32]),
            incoming,
            outgoing,
            Metrics::new(),
        )
        .unwrap();
        (pool, dir)
    }

    #[test]
    fn test_one_sentinel_per_worker_terminates_pool() {
        let queue = TransferQueue::new();
        let (pool, _dir) = spawn_pool(4, &queue);
        assert_eq!(pool.size(), 4);

        for _ in 0..4 {
            queue.push(QueueEntry::Shutdown);
        }
        pool.join().unwrap();
        queue.join();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_missing_sentinel_leaves_worker_blocked() {
        let queue = TransferQueue::new();
        let (pool, _dir) = spawn_pool(2, &queue);

        queue.push(QueueEntry::Shutdown);

        let (tx, rx) = mpsc::channel();
        let joiner = std::thread::spawn(move || {
            pool.join().unwrap();
            tx.send(()).ok();
        });

        // One sentinel for two workers: the pool must not finish.
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

        queue.push(QueueEntry::Shutdown);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        joiner.join().unwrap();
    }

    #[test]
    fn test_workers_drain_tasks_before_shutdown() {
        let queue = TransferQueue::new();
        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming");
        let outgoing = dir.path().join("outgoing");
        std::fs::create_dir_all(&incoming).unwrap();
        std::fs::create_dir_all(&outgoing).unwrap();

        for name in ["a.png", "b.png", "c.png"] {
            DynamicImage::new_rgb8(100, 50)
                .save(incoming.join(name))
                .unwrap();
            queue.push(QueueEntry::Task(ImageTask::new(name)));
        }

        let metrics = Metrics::new();
        let pool = ResizeWorkerPool::spawn(
            2,
            queue.clone(),
            Resizer::new(vec![32, 64]),
            incoming.clone(),
            outgoing.clone(),
            metrics.clone(),
        )
        .unwrap();

        for _ in 0..2 {
            queue.push(QueueEntry::Shutdown);
        }
        pool.join().unwrap();

        assert_eq!(std::fs::read_dir(&outgoing).unwrap().count(), 6);
        assert_eq!(std::fs::read_dir(&incoming).unwrap().count(), 0);
        assert!(metrics.snapshot().produced_bytes > 0);
    }

    #[test]
    fn test_bad_task_does_not_kill_worker() {
        let queue = TransferQueue::new();
        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming");
        let outgoing = dir.path().join("outgoing");
        std::fs::create_dir_all(&incoming).unwrap();
        std::fs::create_dir_all(&outgoing).unwrap();

        std::fs::write(incoming.join("bad.jpg"), b"garbage").unwrap();
        DynamicImage::new_rgb8(100, 50)
            .save(incoming.join("good.png"))
            .unwrap();

        queue.push(QueueEntry::Task(ImageTask::new("bad.jpg")));
        queue.push(QueueEntry::Task(ImageTask::new("good.png")));

        let pool = ResizeWorkerPool::spawn(
            1,
            queue.clone(),
            Resizer::new(vec![32]),
            incoming.clone(),
            outgoing.clone(),
            Metrics::new(),
        )
        .unwrap();

        queue.push(QueueEntry::Shutdown);
        pool.join().unwrap();

        // The worker survived the bad task and still processed the good one.
        assert!(outgoing.join("good_32.png").exists());
        assert_eq!(std::fs::read_dir(&incoming).unwrap().count(), 0);
    }
}
