//! Interrupt-Safe Shutdown Coordinator
//!
//! Guarantees the in-flight batch is flushed and the store closed exactly
//! once, whether the ingestion run ends by exhausting its input or by an
//! operator interrupt.
//!
//! ## Phase Machine
//! ```text
//! Running ──► ShuttingDown ──► Terminated
//! ```
//! The `Running → ShuttingDown` transition is claimed with a
//! compare-exchange, so only one of the interrupt handler and the main
//! loop ever runs the flush-and-close sequence.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::{HopperError, Result};
use crate::ingest::IngestController;

/// Shutdown phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Ingestion loop is reading and staging records
    Running = 0,

    /// Flush-and-close sequence has been claimed and is in progress
    ShuttingDown = 1,

    /// Store is closed; nothing further may touch it
    Terminated = 2,
}

/// Coordinates the one-shot shutdown sequence for an ingestion run
pub struct ShutdownCoordinator {
    phase: AtomicU8,
    controller: Arc<IngestController>,
}

impl ShutdownCoordinator {
    /// Create a coordinator for the given controller
    pub fn new(controller: Arc<IngestController>) -> Arc<Self> {
        Arc::new(Self {
            phase: AtomicU8::new(Phase::Running as u8),
            controller,
        })
    }

    /// Register the interrupt handler (once per `index` invocation)
    ///
    /// On SIGINT: claim the shutdown, flush the pending batch, close the
    /// store, and exit the process with a success status. A second signal
    /// while the first is still being handled finds the phase already
    /// claimed and does nothing.
    pub fn install(self: &Arc<Self>) -> Result<()> {
        let coordinator = Arc::clone(self);

        ctrlc::set_handler(move || {
            if !coordinator.claim() {
                return;
            }
            tracing::info!("interrupt received; committing staged records");
            coordinator.run_shutdown();
            std::process::exit(0);
        })
        .map_err(|e| HopperError::Config(format!("failed to register interrupt handler: {}", e)))
    }

    /// Finish the run after input is exhausted
    ///
    /// Runs the same one-shot sequence as the interrupt path. If the
    /// interrupt handler already claimed it, wait for the handler — it
    /// will close the store and exit the process itself.
    pub fn finish(&self) -> Result<()> {
        if !self.claim() {
            while self.phase() != Phase::Terminated {
                thread::sleep(Duration::from_millis(10));
            }
            return Ok(());
        }

        self.controller.flush();
        let result = self.controller.store().close();
        self.phase
            .store(Phase::Terminated as u8, Ordering::SeqCst);
        result
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        match self.phase.load(Ordering::SeqCst) {
            0 => Phase::Running,
            1 => Phase::ShuttingDown,
            _ => Phase::Terminated,
        }
    }

    /// Try to claim the Running → ShuttingDown transition
    fn claim(&self) -> bool {
        self.phase
            .compare_exchange(
                Phase::Running as u8,
                Phase::ShuttingDown as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Flush, close, mark terminated. Caller must have claimed the phase.
    fn run_shutdown(&self) {
        self.controller.flush();
        if let Err(e) = self.controller.store().close() {
            tracing::error!(error = %e, "failed to close store during shutdown");
        }
        self.phase
            .store(Phase::Terminated as u8, Ordering::SeqCst);
    }
}
