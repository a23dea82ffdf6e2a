//! Query operation
//!
//! Point lookups for each input key against a single snapshot held for
//! the whole run. Read-only; a per-key failure does not halt the stream.

use std::io::{BufRead, Write};

use crate::config::Config;
use crate::error::Result;
use crate::record::Record;
use crate::store::Store;

use super::{display_key, for_each_line};

/// Run the query operation over the given input stream
pub fn run<R: BufRead, W: Write>(config: Config, input: R, output: &mut W) -> Result<()> {
    let store = Store::open(config)?;
    let snapshot = store.snapshot();

    for_each_line(input, |line| {
        let record = Record::parse(line);
        let key = display_key(&record.key);

        match snapshot.get(&record.key) {
            Ok(Some(_)) => writeln!(output, "FOUND: {}", key)?,
            Ok(None) => writeln!(output, "FAILED: {}", key)?,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "lookup error");
                writeln!(output, "FAILED: {}", key)?;
            }
        }
        Ok(())
    })?;

    store.close()
}
