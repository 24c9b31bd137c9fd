//! Logger metrics for observability
//!
//! Counters describing the health of one asynchronous logger: how much was
//! buffered, how many flushes ran, and how much was lost to writer failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one asynchronous logger
///
/// # Example
///
/// ```
/// use rust_line_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_appended();
/// metrics.record_flush(1, 6);
///
/// assert_eq!(metrics.lines_appended(), 1);
/// assert_eq!(metrics.bytes_written(), 6);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines accepted into the buffer (or written through)
    lines_appended: AtomicU64,

    /// Lines written by successful flushes
    lines_flushed: AtomicU64,

    /// Bytes written by successful flushes
    bytes_written: AtomicU64,

    /// Flushes that performed a write
    flush_count: AtomicU64,

    /// Flushes whose write failed
    flush_failures: AtomicU64,

    /// Lines discarded because their flush failed
    lines_lost: AtomicU64,

    /// Values that could not be serialized and were skipped
    serialize_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            lines_appended: AtomicU64::new(0),
            lines_flushed: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            flush_count: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
            lines_lost: AtomicU64::new(0),
            serialize_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_appended(&self) -> u64 {
        self.lines_appended.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_flushed(&self) -> u64 {
        self.lines_flushed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_count(&self) -> u64 {
        self.flush_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_lost(&self) -> u64 {
        self.lines_lost.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn serialize_failures(&self) -> u64 {
        self.serialize_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appended(&self) -> u64 {
        self.lines_appended.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a successful flush of `lines` lines totalling `bytes` bytes
    #[inline]
    pub fn record_flush(&self, lines: u64, bytes: u64) {
        self.flush_count.fetch_add(1, Ordering::Relaxed);
        self.lines_flushed.fetch_add(lines, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a failed flush that discarded `lines` lines
    #[inline]
    pub fn record_flush_failure(&self, lines: u64) -> u64 {
        self.flush_count.fetch_add(1, Ordering::Relaxed);
        self.lines_lost.fetch_add(lines, Ordering::Relaxed);
        self.flush_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_serialize_failure(&self) -> u64 {
        self.serialize_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Lost lines as a percentage (0.0 - 100.0) of lines that reached a flush
    pub fn loss_rate(&self) -> f64 {
        let lost = self.lines_lost() as f64;
        let total = self.lines_flushed() as f64 + lost;
        if total == 0.0 {
            0.0
        } else {
            (lost / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.lines_appended.store(0, Ordering::Relaxed);
        self.lines_flushed.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.flush_count.store(0, Ordering::Relaxed);
        self.flush_failures.store(0, Ordering::Relaxed);
        self.lines_lost.store(0, Ordering::Relaxed);
        self.serialize_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            lines_appended: AtomicU64::new(self.lines_appended()),
            lines_flushed: AtomicU64::new(self.lines_flushed()),
            bytes_written: AtomicU64::new(self.bytes_written()),
            flush_count: AtomicU64::new(self.flush_count()),
            flush_failures: AtomicU64::new(self.flush_failures()),
            lines_lost: AtomicU64::new(self.lines_lost()),
            serialize_failures: AtomicU64::new(self.serialize_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.lines_appended(), 0);
        assert_eq!(metrics.flush_count(), 0);
        assert_eq!(metrics.lines_lost(), 0);
    }

    #[test]
    fn test_record_flush_and_failure() {
        let metrics = LoggerMetrics::new();
        metrics.record_flush(3, 30);
        assert_eq!(metrics.record_flush_failure(2), 0); // Returns previous value

        assert_eq!(metrics.flush_count(), 2);
        assert_eq!(metrics.lines_flushed(), 3);
        assert_eq!(metrics.bytes_written(), 30);
        assert_eq!(metrics.flush_failures(), 1);
        assert_eq!(metrics.lines_lost(), 2);
    }

    #[test]
    fn test_loss_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.loss_rate(), 0.0);

        metrics.record_flush(90, 900);
        metrics.record_flush_failure(10);
        let rate = metrics.loss_rate();
        assert!((9.9..=10.1).contains(&rate), "Loss rate was {}", rate);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_appended();

        let snapshot = metrics.clone();
        metrics.record_appended();
        assert_eq!(metrics.lines_appended(), 2);
        assert_eq!(snapshot.lines_appended(), 1);

        metrics.reset();
        assert_eq!(metrics.lines_appended(), 0);
    }
}
