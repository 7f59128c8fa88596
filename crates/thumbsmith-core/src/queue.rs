//! Thread-safe transfer queue between the fetch and resize stages.
//!
//! The queue carries filenames of downloaded images plus shutdown
//! sentinels. Producers push without blocking; consumers block in
//! `pop` until an entry arrives. `task_done`/`join` track drain state
//! independently of the sentinel mechanism, so the orchestrator can
//! wait for "every pushed entry was consumed and processed".
//!
//! Shutdown protocol: the orchestrator pushes exactly one
//! [`QueueEntry::Shutdown`] per worker after the last real work item.
//! Each worker exits on the first sentinel it sees, so sentinel count
//! must equal worker count or workers block forever.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::types::ImageTask;

/// An entry in the transfer queue: a work item or a shutdown signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEntry {
    /// A downloaded image ready to resize
    Task(ImageTask),

    /// Poison pill: the receiving worker must exit its loop
    Shutdown,
}

#[derive(Debug, Default)]
struct QueueState {
    entries: VecDeque<QueueEntry>,
    /// Entries pushed but not yet marked done by a consumer.
    unfinished: usize,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<QueueState>,
    /// Signaled on every push.
    available: Condvar,
    /// Signaled when the unfinished count returns to zero.
    drained: Condvar,
}

/// FIFO queue shared between the fetch stage and the resize workers.
///
/// Clones are handles to the same queue.
#[derive(Debug, Clone, Default)]
pub struct TransferQueue {
    inner: Arc<Inner>,
}

impl TransferQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        // A panicking holder cannot leave the deque in a torn state;
        // continue with the data as-is.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry. Never blocks; safe from any number of producers.
    pub fn push(&self, entry: QueueEntry) {
        let mut state = self.state();
        state.entries.push_back(entry);
        state.unfinished += 1;
        drop(state);
        self.inner.available.notify_one();
    }

    /// Remove and return the oldest entry, blocking until one exists.
    ///
    /// Entries come out in push order; concurrent consumers each receive
    /// a distinct entry.
    pub fn pop(&self) -> QueueEntry {
        let mut state = self.state();
        loop {
            if let Some(entry) = state.entries.pop_front() {
                return entry;
            }
            state = self
                .inner
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mark one previously popped entry as fully processed.
    pub fn task_done(&self) {
        let mut state = self.state();
        state.unfinished = state.unfinished.saturating_sub(1);
        if state.unfinished == 0 {
            drop(state);
            self.inner.drained.notify_all();
        }
    }

    /// Block until every pushed entry has been popped and marked done.
    pub fn join(&self) {
        let mut state = self.state();
        while state.unfinished > 0 {
            state = self
                .inner
                .drained
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Number of entries currently waiting in the queue.
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    /// True if no entries are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
