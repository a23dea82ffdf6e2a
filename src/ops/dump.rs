//! Dump operation
//!
//! One full forward scan over the store, writing every live entry as a
//! `key,value` line. The output round-trips: feeding it back to the index
//! operation reproduces the same key/value set.

use std::io::Write;

use crate::config::Config;
use crate::error::Result;
use crate::record::SEPARATOR;
use crate::store::Store;

/// Run the dump operation, writing all entries to `output`
pub fn run<W: Write>(config: Config, output: &mut W) -> Result<()> {
    let store = Store::open(config)?;

    for (key, value) in store.scan()? {
        // Raw bytes, not lossy strings: dump output must re-ingest cleanly
        output.write_all(&key)?;
        output.write_all(&[SEPARATOR])?;
        output.write_all(&value)?;
        output.write_all(b"\n")?;
    }
    output.flush()?;

    store.close()
}
