//! The single capability every logger in this crate is built around

use super::error::Result;
use std::sync::Arc;

/// A sink that accepts one log line at a time.
///
/// Every logger implements this, and every wrapper (duration gate, level
/// filter) decorates an inner `Output`, so they compose freely.
///
/// # Example
///
/// ```
/// use rust_line_logger::{Output, Result};
/// use parking_lot::Mutex;
///
/// struct Collect(Mutex<Vec<String>>);
///
/// impl Output for Collect {
///     fn output(&self, line: &str) -> Result<()> {
///         self.0.lock().push(line.to_string());
///         Ok(())
///     }
/// }
/// ```
pub trait Output: Send + Sync {
    /// Emit one line; a trailing newline is added by the implementation
    /// when missing.
    fn output(&self, line: &str) -> Result<()>;

    /// Emit a raw byte payload without requiring valid UTF-8
    fn output_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.output(&String::from_utf8_lossy(bytes))
    }
}

impl<T: Output + ?Sized> Output for &T {
    fn output(&self, line: &str) -> Result<()> {
        (**self).output(line)
    }

    fn output_bytes(&self, bytes: &[u8]) -> Result<()> {
        (**self).output_bytes(bytes)
    }
}

impl<T: Output + ?Sized> Output for Box<T> {
    fn output(&self, line: &str) -> Result<()> {
        (**self).output(line)
    }

    fn output_bytes(&self, bytes: &[u8]) -> Result<()> {
        (**self).output_bytes(bytes)
    }
}

impl<T: Output + ?Sized> Output for Arc<T> {
    fn output(&self, line: &str) -> Result<()> {
        (**self).output(line)
    }

    fn output_bytes(&self, bytes: &[u8]) -> Result<()> {
        (**self).output_bytes(bytes)
    }
}
