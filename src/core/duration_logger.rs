//! Duration-gated logger: at most one line per interval

use super::error::Result;
use super::line_logger::LineLogger;
use super::output::Output;
use super::timestamp::TimestampFormat;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Default minimum interval between accepted lines
pub const DEFAULT_GATE_DURATION: Duration = Duration::from_secs(1);

struct GateState {
    duration: Duration,
    last_accepted: Option<Instant>,
}

/// Forwards a line to the inner output only if the configured duration has
/// elapsed since the last forwarded line; everything else is dropped
/// silently.
///
/// # Example
///
/// ```
/// use rust_line_logger::{DurationLogger, Output};
/// use rust_line_logger::writers::SharedBuffer;
/// use std::time::Duration;
///
/// let sink = SharedBuffer::new();
/// let logger = DurationLogger::line(sink.clone(), "", "")
///     .with_duration(Duration::from_secs(60));
///
/// logger.output("queue is full").unwrap();
/// logger.output("queue is full").unwrap();
/// assert_eq!(sink.contents(), "queue is full\n");
/// ```
pub struct DurationLogger<O: Output = LineLogger> {
    inner: O,
    gate: Mutex<GateState>,
    suppressed: AtomicU64,
}

impl<O: Output> DurationLogger<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            gate: Mutex::new(GateState {
                duration: DEFAULT_GATE_DURATION,
                last_accepted: None,
            }),
            suppressed: AtomicU64::new(0),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_duration(self, duration: Duration) -> Self {
        self.set_duration(duration);
        self
    }

    pub fn set_duration(&self, duration: Duration) {
        self.gate.lock().duration = duration;
    }

    pub fn duration(&self) -> Duration {
        self.gate.lock().duration
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn into_inner(self) -> O {
        self.inner
    }

    /// Lines dropped because they arrived inside the interval
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Decide whether a line arriving at `now` passes the gate
    fn admit(&self, now: Instant) -> bool {
        let mut gate = self.gate.lock();
        if let Some(last) = gate.last_accepted {
            // An interval too large to represent never reopens
            let within = last.checked_add(gate.duration).map_or(true, |open| open > now);
            if within {
                self.suppressed.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        }
        gate.last_accepted = Some(now);
        true
    }
}

impl DurationLogger<LineLogger> {
    /// Gate a new [`LineLogger`] writing to `out`
    pub fn line<W>(out: W, prefix: impl Into<String>, time_format: impl Into<TimestampFormat>) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::new(LineLogger::new(out, prefix, time_format))
    }
}

impl<O: Output> Output for DurationLogger<O> {
    fn output(&self, line: &str) -> Result<()> {
        if self.admit(Instant::now()) {
            self.inner.output(line)
        } else {
            Ok(())
        }
    }

    fn output_bytes(&self, bytes: &[u8]) -> Result<()> {
        if self.admit(Instant::now()) {
            self.inner.output_bytes(bytes)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::SharedBuffer;
    use std::sync::Arc;

    #[test]
    fn test_gate_accepts_first_and_after_interval() {
        let logger = DurationLogger::line(SharedBuffer::new(), "", "")
            .with_duration(Duration::from_millis(100));
        let base = Instant::now();

        let accepted = [0u64, 50, 110]
            .iter()
            .filter(|&&ms| logger.admit(base + Duration::from_millis(ms)))
            .count();

        assert_eq!(accepted, 2);
        assert_eq!(logger.suppressed_count(), 1);
    }

    #[test]
    fn test_gate_reopens_exactly_at_duration() {
        let logger = DurationLogger::line(SharedBuffer::new(), "", "")
            .with_duration(Duration::from_millis(100));
        let base = Instant::now();

        assert!(logger.admit(base));
        assert!(!logger.admit(base + Duration::from_millis(99)));
        assert!(logger.admit(base + Duration::from_millis(100)));
    }

    #[test]
    fn test_huge_duration_never_reopens() {
        let logger = DurationLogger::line(SharedBuffer::new(), "", "")
            .with_duration(Duration::MAX);
        let base = Instant::now();

        assert!(logger.admit(base));
        assert!(!logger.admit(base + Duration::from_secs(3600)));
    }

    #[test]
    fn test_output_with_sleeps() {
        let sink = SharedBuffer::new();
        let logger = DurationLogger::line(sink.clone(), "=====", "")
            .with_duration(Duration::from_millis(100));

        logger.output("hello world").unwrap();
        logger.output("hello world2").unwrap();
        std::thread::sleep(Duration::from_millis(105));
        logger.output("hello world3").unwrap();
        logger.output("hello world3").unwrap();
        std::thread::sleep(Duration::from_millis(10));
        logger.output("hello world4").unwrap();

        assert_eq!(sink.contents(), "===== hello world\n===== hello world3\n");
        assert_eq!(logger.suppressed_count(), 3);
    }

    #[test]
    fn test_one_write_per_interval_under_contention() {
        let sink = SharedBuffer::new();
        let logger = Arc::new(
            DurationLogger::line(sink.clone(), "", "").with_duration(Duration::from_secs(60)),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        logger.output("burst").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(sink.write_count(), 1);
        assert_eq!(logger.suppressed_count(), 799);
    }

    #[test]
    fn test_set_duration_while_running() {
        let logger = DurationLogger::line(SharedBuffer::new(), "", "");
        assert_eq!(logger.duration(), DEFAULT_GATE_DURATION);

        let base = Instant::now();
        assert!(logger.admit(base));
        assert!(!logger.admit(base + Duration::from_millis(20)));

        logger.set_duration(Duration::from_millis(10));
        assert!(logger.admit(base + Duration::from_millis(20)));
    }

    #[test]
    fn test_wraps_any_output() {
        use crate::core::async_logger::AsyncLogger;
        use crate::core::line_logger::LineFormat;

        let sink = SharedBuffer::new();
        let async_logger = Arc::new(AsyncLogger::new(
            "gated",
            Box::new(sink.clone()),
            LineFormat::default(),
        ));
        let logger = DurationLogger::new(Arc::clone(&async_logger));

        logger.output("first").unwrap();
        logger.output("second").unwrap();
        async_logger.flush().unwrap();

        assert_eq!(sink.contents(), "first\n");
    }
}
