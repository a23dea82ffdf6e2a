//! Operation Executors
//!
//! Thin orchestrators wiring the record parser, the ingestion controller,
//! and the store together — one per subcommand. Each executor is generic
//! over its input/output streams so tests can drive it with byte buffers.
//!
//! Data flow:
//! - `index`:  input → parser → batch commit controller → store
//! - `query`:  input → parser (key only) → snapshot lookups → status lines
//! - `remove`: input → parser (key only) → per-key durable deletes
//! - `dump`:   store scan → `key,value` lines

pub mod dump;
pub mod index;
pub mod query;
pub mod remove;

use std::borrow::Cow;
use std::io::BufRead;

use crate::error::Result;

/// Call `f` for every input line, stripped of its line terminator
///
/// Lines are raw bytes; a trailing `\n` or `\r\n` is removed but
/// nothing else is trimmed or validated, so CRLF input produces the
/// same records as LF input.
pub(crate) fn for_each_line<R, F>(mut input: R, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        f(&buf)?;
    }
}

/// Render a key for a status line (lossy for non-UTF-8 bytes)
pub(crate) fn display_key(key: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(key)
}
