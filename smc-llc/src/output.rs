//! A shared text sink for rendered packets.
//!
//! The dump binary streams to stdout and has no need for it. It serves
//! embedders that render on one thread and publish what has accumulated
//! so far to readers on others: anything that implements `io::Write` can
//! target `&OutputBuffer`.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Accumulates rendered output behind a lock.
///
/// One producer appends while any number of readers take snapshots. A
/// snapshot is always a prefix of what is eventually written, because
/// appends are applied whole under the lock.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    inner: Mutex<String>,
}

impl OutputBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    // The text is only ever extended by complete `push_str` calls, so a
    // panic elsewhere cannot leave it half written.
    fn lock(&self) -> MutexGuard<'_, String> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `text`.
    pub fn append(&self, text: &str) {
        self.lock().push_str(text);
    }

    /// A copy of everything written so far.
    pub fn snapshot(&self) -> String {
        self.lock().clone()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl io::Write for &OutputBuffer {
    /// Appends `buf` if it is valid UTF-8, fails with
    /// [`io::ErrorKind::InvalidData`] otherwise.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.append(text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
