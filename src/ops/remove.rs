//! Remove operation
//!
//! Deletes each input key with an immediate per-key durable commit — a
//! deliberate throughput asymmetry with the batched index operation. A
//! per-key failure is reported inline and does not halt later keys.

use std::io::{BufRead, Write};

use crate::config::Config;
use crate::error::Result;
use crate::record::Record;
use crate::store::Store;

use super::{display_key, for_each_line};

/// Run the remove operation over the given input stream
pub fn run<R: BufRead, W: Write>(config: Config, input: R, output: &mut W) -> Result<()> {
    let store = Store::open(config)?;

    for_each_line(input, |line| {
        let record = Record::parse(line);
        let key = display_key(&record.key);

        match store.delete(&record.key) {
            Ok(()) => writeln!(output, "SUCCESS: {}", key)?,
            Err(e) => writeln!(output, "ERROR: {}: {}", e, key)?,
        }
        Ok(())
    })?;

    store.close()
}
