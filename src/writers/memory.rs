//! In-memory writer

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Debug, Default)]
struct BufferState {
    data: Vec<u8>,
    writes: usize,
    fail_writes: bool,
}

/// Cloneable in-memory sink
///
/// Every clone shares the same storage, so a caller can hand one clone to a
/// logger as its destination and keep another to inspect what was written.
///
/// # Example
///
/// ```
/// use rust_line_logger::writers::SharedBuffer;
/// use std::io::Write;
///
/// let sink = SharedBuffer::new();
/// let mut handle = sink.clone();
/// handle.write_all(b"hello\n").unwrap();
/// assert_eq!(sink.contents(), "hello\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    state: Arc<Mutex<BufferState>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.state.lock().data).into_owned()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.state.lock().data.clone()
    }

    /// Number of successful `write` calls
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().data.is_empty()
    }

    /// Make subsequent writes fail with `ErrorKind::Other`
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Drop the stored contents and reset the write counter
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.data.clear();
        state.writes = 0;
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "shared buffer rejected write"));
        }
        state.data.extend_from_slice(buf);
        state.writes += 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
