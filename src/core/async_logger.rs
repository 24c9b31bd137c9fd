//! Buffered logger flushed off the calling path
//!
//! Appends format the line and copy it into an in-memory buffer; nothing
//! touches the destination writer until a flush swaps the buffer out and
//! writes it in one call. Flushes are normally driven by a
//! [`LoggerRegistry`](super::registry::LoggerRegistry), but can also be
//! triggered by hand.
//!
//! Buffered lines live only in memory: a crash before the next flush loses
//! them, and a failed flush discards the lines it was carrying.

use super::error::Result;
use super::line_logger::LineFormat;
use super::metrics::LoggerMetrics;
use super::output::Output;
use super::sampling::WriteSampler;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Local};
use parking_lot::{Condvar, Mutex, RwLock};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Default per-logger flush interval (advisory)
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

const BUFFER_INITIAL_CAPACITY: usize = 4096;

/// Whether a flush is currently in flight for a logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStatus {
    Idle,
    Flushing,
}

struct PendingLines {
    data: Vec<u8>,
    lines: usize,
}

impl PendingLines {
    fn new() -> Self {
        Self {
            data: Vec::with_capacity(BUFFER_INITIAL_CAPACITY),
            lines: 0,
        }
    }
}

struct FlushState {
    status: FlushStatus,
    interval: Duration,
    last_flush: Option<DateTime<Local>>,
}

/// Resets the status to Idle when the flush ends, however it ends
struct FlushGuard<'a> {
    logger: &'a AsyncLogger,
    started: Instant,
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.logger.finish_flush(self.started);
    }
}

/// Asynchronous, buffered logger
///
/// Obtain instances through
/// [`LoggerRegistry::get_or_create`](super::registry::LoggerRegistry::get_or_create).
///
/// # Example
///
/// ```
/// use rust_line_logger::{LoggerRegistry, Output};
/// use rust_line_logger::writers::SharedBuffer;
///
/// let registry = LoggerRegistry::new();
/// let sink = SharedBuffer::new();
/// let logger = registry.get_or_create(sink.clone(), "", "", "requests").unwrap();
///
/// logger.append("hello").unwrap();
/// logger.output("world").unwrap();
/// assert!(sink.is_empty());
///
/// logger.flush().unwrap();
/// assert_eq!(sink.contents(), "hello\nworld\n");
/// ```
pub struct AsyncLogger {
    key: String,
    format: RwLock<LineFormat>,
    writer: Mutex<Box<dyn Write + Send>>,
    buffer: Mutex<PendingLines>,
    flush_state: Mutex<FlushState>,
    flush_done: Condvar,
    buffered: AtomicBool,
    sampler: WriteSampler,
    metrics: LoggerMetrics,
}

impl AsyncLogger {
    pub(crate) fn new(key: impl Into<String>, writer: Box<dyn Write + Send>, format: LineFormat) -> Self {
        Self {
            key: key.into(),
            format: RwLock::new(format),
            writer: Mutex::new(writer),
            buffer: Mutex::new(PendingLines::new()),
            flush_state: Mutex::new(FlushState {
                status: FlushStatus::Idle,
                interval: DEFAULT_FLUSH_INTERVAL,
                last_flush: None,
            }),
            flush_done: Condvar::new(),
            buffered: AtomicBool::new(true),
            sampler: WriteSampler::always(),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Registry key this logger was created under
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn prefix(&self) -> String {
        self.format.read().prefix().to_string()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.format.write().set_prefix(prefix);
    }

    pub fn time_format(&self) -> TimestampFormat {
        self.format.read().timestamp_format().clone()
    }

    pub fn set_time_format(&self, format: impl Into<TimestampFormat>) {
        self.format.write().set_timestamp_format(format);
    }

    /// Keep each subsequent line with probability `probability`.
    ///
    /// Values of 1.0 or more (the default) keep everything; 0.0 or less keep
    /// nothing. Dropped lines are not errors.
    pub fn set_write_probability(&self, probability: f64) {
        self.sampler.set_probability(probability);
    }

    pub fn write_probability(&self) -> f64 {
        self.sampler.probability()
    }

    /// Change the advisory flush interval.
    ///
    /// The background ticker flushes at its own fixed cadence; this value
    /// only sets the duration above which a single flush is reported as slow.
    pub fn set_flush_interval(&self, interval: Duration) {
        self.flush_state.lock().interval = interval;
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_state.lock().interval
    }

    /// Switch between buffering (the default) and writing every line
    /// straight through to the destination.
    ///
    /// Turning buffering off writes what is pending before any direct write
    /// can reach the destination, so lines keep their append order.
    pub fn set_buffered(&self, buffered: bool) -> Result<()> {
        if buffered {
            let _pending = self.buffer.lock();
            self.buffered.store(true, Ordering::Release);
            return Ok(());
        }

        // Lock order: flush claim, writer, buffer
        self.claim_flush(true);
        let _guard = FlushGuard {
            logger: self,
            started: Instant::now(),
        };
        let mut writer = self.writer.lock();
        let pending = {
            let mut buffer = self.buffer.lock();
            if !self.buffered.swap(false, Ordering::AcqRel) {
                return Ok(());
            }
            std::mem::replace(&mut *buffer, PendingLines::new())
        };
        self.write_pending(&mut **writer, pending)
    }

    pub fn is_buffered(&self) -> bool {
        self.buffered.load(Ordering::Acquire)
    }

    pub fn status(&self) -> FlushStatus {
        self.flush_state.lock().status
    }

    /// Local time at which the most recent flush finished
    pub fn last_flush(&self) -> Option<DateTime<Local>> {
        self.flush_state.lock().last_flush
    }

    /// Bytes waiting for the next flush
    pub fn buffered_len(&self) -> usize {
        self.buffer.lock().data.len()
    }

    /// Lines waiting for the next flush
    pub fn pending_lines(&self) -> usize {
        self.buffer.lock().lines
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn sampler(&self) -> &WriteSampler {
        &self.sampler
    }

    /// Format `line` and add it to the buffer.
    ///
    /// Never performs I/O while buffering is on, so it cannot fail; with
    /// buffering off the writer's error is returned.
    pub fn append(&self, line: &str) -> Result<()> {
        self.append_bytes(line.as_bytes())
    }

    /// Same as [`append`](Self::append) for a raw byte payload
    pub fn append_bytes(&self, body: &[u8]) -> Result<()> {
        if !self.sampler.should_write() {
            return Ok(());
        }
        self.push(body)
    }

    /// Serialize `value` as one JSON line and append it.
    ///
    /// A value that fails to serialize is skipped and counted in
    /// [`LoggerMetrics::serialize_failures`]; the call still succeeds.
    pub fn append_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        if !self.sampler.should_write() {
            return Ok(());
        }
        match serde_json::to_vec(value) {
            Ok(body) => self.push(&body),
            Err(_) => {
                self.metrics.record_serialize_failure();
                Ok(())
            }
        }
    }

    fn push(&self, body: &[u8]) -> Result<()> {
        // Stamp before waiting on any lock
        let now = Local::now();

        let mut line = Vec::with_capacity(body.len() + 64);
        self.format.read().render_into(&mut line, &now, body);

        {
            // The mode is only switched under this lock
            let mut pending = self.buffer.lock();
            if self.is_buffered() {
                pending.data.extend_from_slice(&line);
                pending.lines += 1;
                drop(pending);
                self.metrics.record_appended();
                return Ok(());
            }
        }

        self.writer.lock().write_all(&line)?;
        self.metrics.record_appended();
        Ok(())
    }

    /// Write everything buffered so far in a single write.
    ///
    /// Waits if another flush of this logger is in flight, then drains what
    /// was appended in the meantime. An empty buffer performs no I/O.
    pub fn flush(&self) -> Result<()> {
        self.claim_flush(true);
        let _guard = FlushGuard {
            logger: self,
            started: Instant::now(),
        };
        self.drain()
    }

    /// Like [`flush`](Self::flush), but returns `Ok(false)` immediately if
    /// another flush is in flight.
    pub fn try_flush(&self) -> Result<bool> {
        if !self.claim_flush(false) {
            return Ok(false);
        }
        let _guard = FlushGuard {
            logger: self,
            started: Instant::now(),
        };
        self.drain().map(|()| true)
    }

    /// Like [`flush`](Self::flush), but waits at most `timeout` for an
    /// in-flight flush; returns `Ok(false)` if it is still running then.
    pub fn flush_timeout(&self, timeout: Duration) -> Result<bool> {
        self.flush_until(Instant::now() + timeout)
    }

    pub(crate) fn flush_until(&self, deadline: Instant) -> Result<bool> {
        if !self.claim_flush_until(deadline) {
            return Ok(false);
        }
        let _guard = FlushGuard {
            logger: self,
            started: Instant::now(),
        };
        self.drain().map(|()| true)
    }

    fn claim_flush_until(&self, deadline: Instant) -> bool {
        let mut state = self.flush_state.lock();
        while state.status == FlushStatus::Flushing {
            if self.flush_done.wait_until(&mut state, deadline).timed_out()
                && state.status == FlushStatus::Flushing
            {
                return false;
            }
        }
        state.status = FlushStatus::Flushing;
        true
    }

    /// Move the status from Idle to Flushing.
    ///
    /// Returns false without waiting when `wait` is false and a flush is
    /// already in flight.
    pub(crate) fn claim_flush(&self, wait: bool) -> bool {
        let mut state = self.flush_state.lock();
        while state.status == FlushStatus::Flushing {
            if !wait {
                return false;
            }
            self.flush_done.wait(&mut state);
        }
        state.status = FlushStatus::Flushing;
        true
    }

    /// Run a flush previously claimed with [`claim_flush`](Self::claim_flush)
    pub(crate) fn run_claimed_flush(&self) -> Result<()> {
        let _guard = FlushGuard {
            logger: self,
            started: Instant::now(),
        };
        self.drain()
    }

    fn drain(&self) -> Result<()> {
        let pending = std::mem::replace(&mut *self.buffer.lock(), PendingLines::new());
        if pending.data.is_empty() {
            return Ok(());
        }

        let mut writer = self.writer.lock();
        self.write_pending(&mut **writer, pending)
    }

    /// Write a drained batch in one call and record the outcome
    fn write_pending(&self, writer: &mut dyn Write, pending: PendingLines) -> Result<()> {
        if pending.data.is_empty() {
            return Ok(());
        }

        let result = writer
            .write_all(&pending.data)
            .and_then(|()| writer.flush());

        match result {
            Ok(()) => {
                self.metrics
                    .record_flush(pending.lines as u64, pending.data.len() as u64);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_flush_failure(pending.lines as u64);
                Err(e.into())
            }
        }
    }

    fn finish_flush(&self, started: Instant) {
        let elapsed = started.elapsed();
        let interval = {
            let mut state = self.flush_state.lock();
            state.status = FlushStatus::Idle;
            state.last_flush = Some(Local::now());
            state.interval
        };
        self.flush_done.notify_all();

        if elapsed > interval {
            eprintln!(
                "[LOGGER WARNING] Flush of '{}' took {:?}, longer than its flush interval {:?}",
                self.key, elapsed, interval
            );
        }
    }
}

impl Output for AsyncLogger {
    fn output(&self, line: &str) -> Result<()> {
        self.append(line)
    }

    fn output_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.append_bytes(bytes)
    }
}

impl fmt::Debug for AsyncLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLogger")
            .field("key", &self.key)
            .field("status", &self.status())
            .field("pending_lines", &self.pending_lines())
            .field("write_probability", &self.write_probability())
            .finish_non_exhaustive()
    }
}
