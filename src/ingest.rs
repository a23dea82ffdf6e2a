//! Batch Commit Controller
//!
//! Accumulates parsed records into a pending write batch and decides the
//! durability boundary: after every `batch_size` staged records the batch
//! is committed synchronously and a fresh one started.
//!
//! ## Concurrency
//! `stage` and `flush` both take the internal mutex, so the interrupt
//! handler's flush can never observe a half-staged record: it runs either
//! before or after any in-flight `stage`, never in the middle of one.
//!
//! ## Failure Semantics
//! A failed commit is logged and ingestion continues with a fresh batch —
//! best effort per batch, no retry, no abort of the input stream.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::record::Record;
use crate::store::{Store, WriteBatch};

/// Owns the pending batch for one ingestion run
pub struct IngestController {
    store: Arc<Store>,

    /// Staged-record count at which the pending batch is committed
    batch_size: usize,

    /// Pending batch and run counters, guarded as one unit
    inner: Mutex<IngestState>,
}

struct IngestState {
    batch: WriteBatch,
    staged: u64,
    started: Instant,
}

impl IngestController {
    /// Create a controller for one ingestion run
    pub fn new(store: Arc<Store>, batch_size: usize) -> Self {
        // A threshold of 0 would commit forever without staging anything
        let batch_size = batch_size.max(1);

        Self {
            store,
            batch_size,
            inner: Mutex::new(IngestState {
                batch: WriteBatch::new(),
                staged: 0,
                started: Instant::now(),
            }),
        }
    }

    /// Stage a record; commits the batch when the threshold is reached
    pub fn stage(&self, record: Record) {
        let mut state = self.inner.lock();
        state.batch.set(record.key, record.value);
        state.staged += 1;

        if state.batch.len() >= self.batch_size {
            self.commit_locked(&mut state);
        }
    }

    /// Commit whatever is currently staged
    ///
    /// No-op on an empty batch, so calling it again after the threshold
    /// commit (or from both the interrupt handler and the main loop) is
    /// harmless.
    pub fn flush(&self) {
        let mut state = self.inner.lock();
        if state.batch.is_empty() {
            return;
        }
        self.commit_locked(&mut state);
    }

    /// Total records staged so far in this run
    pub fn records_staged(&self) -> u64 {
        self.inner.lock().staged
    }

    /// The store this controller writes to
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Commit the pending batch and start a fresh one. Caller holds the lock.
    fn commit_locked(&self, state: &mut IngestState) {
        let near_key = state
            .batch
            .last_key()
            .map(|k| String::from_utf8_lossy(k).into_owned())
            .unwrap_or_default();
        let batch = std::mem::take(&mut state.batch);
        let records = batch.len();

        match self.store.commit(batch) {
            Ok(()) => {
                let elapsed = state.started.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    state.staged as f64 / elapsed
                } else {
                    0.0
                };
                tracing::info!(
                    records,
                    total = state.staged,
                    rate_per_sec = rate,
                    near_key = %near_key,
                    "committed batch"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    records,
                    "batch commit failed; continuing with a fresh batch"
                );
            }
        }
    }
}
