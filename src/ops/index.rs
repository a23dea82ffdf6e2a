//! Index operation
//!
//! Bulk-loads `key,value` lines into the store through the batch commit
//! controller, with the interrupt-safe shutdown coordinator installed for
//! the duration of the run.

use std::io::BufRead;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::ingest::IngestController;
use crate::record::Record;
use crate::shutdown::ShutdownCoordinator;
use crate::store::Store;

use super::for_each_line;

/// Run the index operation over the given input stream
pub fn run<R: BufRead>(config: Config, input: R) -> Result<()> {
    let batch_size = config.batch_size;
    let store = Arc::new(Store::open(config)?);
    let controller = Arc::new(IngestController::new(store, batch_size));

    let coordinator = ShutdownCoordinator::new(Arc::clone(&controller));
    coordinator.install()?;

    // A read failure still flushes what was staged before propagating
    let read_result = ingest(&controller, input);

    tracing::info!(
        records = controller.records_staged(),
        "input ended; committing final batch"
    );
    let finish_result = coordinator.finish();

    read_result.and(finish_result)
}

/// Stage every input line into the controller
///
/// Split out from [`run`] so tests can drive the pipeline without
/// registering a process-wide signal handler.
pub fn ingest<R: BufRead>(controller: &IngestController, input: R) -> Result<()> {
    for_each_line(input, |line| {
        controller.stage(Record::parse(line));
        Ok(())
    })
}
