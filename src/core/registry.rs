//! Registry of asynchronous loggers and the background flush driver
//!
//! The registry owns every [`AsyncLogger`] it creates for its whole lifetime.
//! Once started, one ticker thread wakes every tick interval, claims each
//! logger that is not already flushing and runs each claimed flush on its own
//! short-lived thread. A logger that is still busy from an earlier tick is
//! skipped, so a slow writer never accumulates flushes and never delays the
//! others.
//!
//! # Example
//!
//! ```
//! use rust_line_logger::LoggerRegistry;
//! use rust_line_logger::writers::SharedBuffer;
//! use std::time::Duration;
//!
//! let registry = LoggerRegistry::builder()
//!     .tick_interval(Duration::from_millis(50))
//!     .build()
//!     .unwrap();
//! registry.start().unwrap();
//!
//! let sink = SharedBuffer::new();
//! let logger = registry.get_or_create(sink.clone(), "api", "", "access").unwrap();
//! logger.append("GET /health 200").unwrap();
//!
//! // Stopping flushes whatever is still buffered
//! assert!(registry.stop(Duration::from_secs(1)));
//! assert_eq!(sink.contents(), "api GET /health 200\n");
//! ```

use super::async_logger::AsyncLogger;
use super::error::{LoggerError, Result};
use super::line_logger::LineFormat;
use super::timestamp::TimestampFormat;
use crossbeam_channel::{select, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Leading character reserved for internally protected registry keys
pub const RESERVED_KEY_PREFIX: char = '_';

/// Default interval between background flush passes
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Default time `stop` waits for the driver threads when the registry is
/// dropped while running
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Registry configuration
///
/// Deserializable so hosting applications can embed it in their own
/// configuration files; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Milliseconds between background flush passes
    pub tick_interval_ms: u64,

    /// Name of the ticker thread; flush threads get the logger key as suffix
    pub thread_name: String,

    /// Milliseconds `shutdown` (and drop) may spend stopping the ticker and
    /// flushing every logger
    pub shutdown_timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            thread_name: "line-logger-flush".to_string(),
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT.as_millis() as u64,
        }
    }
}

impl RegistryConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(LoggerError::config(
                "LoggerRegistry",
                "tick_interval_ms must be greater than zero",
            ));
        }
        if self.thread_name.is_empty() {
            return Err(LoggerError::config(
                "LoggerRegistry",
                "thread_name must not be empty",
            ));
        }
        Ok(())
    }
}

struct RegistryShared {
    loggers: RwLock<HashMap<String, Arc<AsyncLogger>>>,
    protected: RwLock<HashSet<String>>,
}

impl RegistryShared {
    /// Claim every idle logger and flush each one on its own thread; returns
    /// how many flushes were launched.
    fn dispatch_idle(&self, thread_name: &str) -> usize {
        let claimed: Vec<Arc<AsyncLogger>> = self
            .loggers
            .read()
            .values()
            .filter(|logger| logger.claim_flush(false))
            .cloned()
            .collect();

        for logger in &claimed {
            let job = Arc::clone(logger);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", thread_name, logger.key()))
                .spawn(move || run_flush(&job));

            if let Err(e) = spawned {
                // Run it here so the claim is released
                eprintln!(
                    "[LOGGER WARNING] Could not spawn flush thread for '{}': {}. Flushing inline.",
                    logger.key(),
                    e
                );
                run_flush(logger);
            }
        }

        claimed.len()
    }

    fn snapshot(&self) -> Vec<Arc<AsyncLogger>> {
        self.loggers.read().values().cloned().collect()
    }
}

struct Driver {
    shutdown: Sender<()>,
    ticker: JoinHandle<()>,
}

/// Pool of asynchronous loggers keyed by caller-supplied identifiers
///
/// Constructed once by the hosting application and shared by reference.
/// Entries are never removed.
pub struct LoggerRegistry {
    config: RegistryConfig,
    shared: Arc<RegistryShared>,
    driver: Mutex<Option<Driver>>,
}

impl LoggerRegistry {
    /// Create a stopped registry with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(RegistryConfig::default())
    }

    /// Create a stopped registry with a custom configuration
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: RegistryConfig) -> Self {
        Self {
            config,
            shared: Arc::new(RegistryShared {
                loggers: RwLock::new(HashMap::new()),
                protected: RwLock::new(HashSet::new()),
            }),
            driver: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Return the logger registered under `key`, creating it on first use.
    ///
    /// The first registration wins: when `key` already exists, `writer`,
    /// `prefix` and `time_format` are ignored. A key that was registered as
    /// protected is transparently mapped to its internal alias. Keys starting
    /// with [`RESERVED_KEY_PREFIX`] are rejected.
    pub fn get_or_create<W>(
        &self,
        writer: W,
        prefix: impl Into<String>,
        time_format: impl Into<TimestampFormat>,
        key: &str,
    ) -> Result<Arc<AsyncLogger>>
    where
        W: Write + Send + 'static,
    {
        check_key(key)?;

        let protected = self.shared.protected.read();
        let internal_key = if protected.contains(key) {
            alias(key)
        } else {
            key.to_string()
        };
        let logger = self.insert(internal_key, writer, LineFormat::new(prefix, time_format));
        drop(protected);

        Ok(logger)
    }

    /// Register `key` as protected and return the logger behind it.
    ///
    /// From now on, `get_or_create` calls naming `key` are silently given a
    /// separate logger under an internal alias instead of this one.
    /// Registering an already protected key again returns the same logger; a
    /// key that callers already created through `get_or_create` cannot be
    /// protected afterwards and yields an
    /// [`InvalidConfiguration`](LoggerError::InvalidConfiguration) error.
    pub fn register_protected<W>(
        &self,
        writer: W,
        prefix: impl Into<String>,
        time_format: impl Into<TimestampFormat>,
        key: &str,
    ) -> Result<Arc<AsyncLogger>>
    where
        W: Write + Send + 'static,
    {
        check_key(key)?;

        let mut protected = self.shared.protected.write();
        if !protected.contains(key) && self.shared.loggers.read().contains_key(key) {
            return Err(LoggerError::config(
                "LoggerRegistry",
                format!("key '{}' is already in use and cannot be protected", key),
            ));
        }
        protected.insert(key.to_string());
        let logger = self.insert(key.to_string(), writer, LineFormat::new(prefix, time_format));
        drop(protected);

        Ok(logger)
    }

    fn insert<W>(&self, internal_key: String, writer: W, format: LineFormat) -> Arc<AsyncLogger>
    where
        W: Write + Send + 'static,
    {
        let mut loggers = self.shared.loggers.write();
        Arc::clone(loggers.entry(internal_key).or_insert_with_key(|key| {
            Arc::new(AsyncLogger::new(key.clone(), Box::new(writer), format))
        }))
    }

    /// Look up a logger the way `get_or_create` would resolve `key`
    pub fn get(&self, key: &str) -> Option<Arc<AsyncLogger>> {
        let protected = self.shared.protected.read();
        let internal_key = if protected.contains(key) {
            alias(key)
        } else {
            key.to_string()
        };
        self.shared.loggers.read().get(&internal_key).cloned()
    }

    /// Look up the protected logger registered under `key`
    pub fn get_protected(&self, key: &str) -> Option<Arc<AsyncLogger>> {
        if !self.is_protected(key) {
            return None;
        }
        self.shared.loggers.read().get(key).cloned()
    }

    pub fn is_protected(&self, key: &str) -> bool {
        self.shared.protected.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.shared.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.loggers.read().is_empty()
    }

    /// Internal keys of every registered logger, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.shared.loggers.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_running(&self) -> bool {
        self.driver.lock().is_some()
    }

    /// Start the background ticker.
    ///
    /// Calling `start` on a running registry does nothing.
    pub fn start(&self) -> Result<()> {
        let mut driver = self.driver.lock();
        if driver.is_some() {
            return Ok(());
        }

        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
        let shared = Arc::clone(&self.shared);
        let interval = self.config.tick_interval();
        let thread_name = self.config.thread_name.clone();
        let ticker = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || run_ticker(shared, interval, thread_name, shutdown_rx))
            .map_err(|e| LoggerError::io_operation("spawning flush ticker", "ticker thread", e))?;

        *driver = Some(Driver {
            shutdown: shutdown_tx,
            ticker,
        });
        Ok(())
    }

    /// Flush every registered logger now, waiting for in-flight flushes.
    ///
    /// All loggers are attempted; the first failure is returned.
    pub fn flush_all(&self) -> Result<()> {
        let mut first_error = None;
        for logger in self.shared.snapshot() {
            if let Err(e) = logger.flush() {
                report_flush_error(logger.key(), &e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Stop the background ticker and flush every logger.
    ///
    /// The whole call is bounded by `timeout`. A logger whose flush is still
    /// in flight when the deadline passes is skipped and keeps its pending
    /// lines. Returns `true` if the ticker stopped and every logger was
    /// flushed successfully in time.
    pub fn stop(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut clean = true;

        let driver = self.driver.lock().take();
        if let Some(driver) = driver {
            drop(driver.shutdown);
            if !join_with_deadline(driver.ticker, deadline, timeout) {
                clean = false;
            }
        }

        for logger in self.shared.snapshot() {
            match logger.flush_until(deadline) {
                Ok(true) => {}
                Ok(false) => {
                    eprintln!(
                        "[LOGGER WARNING] Logger '{}' was still flushing after {:?}. \
                         Its pending lines were not written.",
                        logger.key(),
                        timeout
                    );
                    clean = false;
                }
                Err(e) => {
                    eprintln!("[LOGGER ERROR] Failed to flush '{}' during shutdown: {}", logger.key(), e);
                    clean = false;
                }
            }
        }

        clean
    }

    /// `stop` with the configured shutdown timeout
    pub fn shutdown(&self) -> bool {
        self.stop(self.config.shutdown_timeout())
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LoggerRegistry {
    fn drop(&mut self) {
        if !self.shutdown() {
            eprintln!("[LOGGER WARNING] Logger registry did not shut down cleanly. Some logs may be lost.");
        }
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("config", &self.config)
            .field("keys", &self.keys())
            .field("running", &self.is_running())
            .finish()
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.starts_with(RESERVED_KEY_PREFIX) {
        return Err(LoggerError::reserved_key(key, RESERVED_KEY_PREFIX));
    }
    Ok(())
}

fn alias(key: &str) -> String {
    format!("{}{}", RESERVED_KEY_PREFIX, key)
}

fn report_flush_error(key: &str, error: &LoggerError) {
    eprintln!("[LOGGER ERROR] Flush of '{}' failed: {}", key, error);
}

fn run_ticker(
    shared: Arc<RegistryShared>,
    interval: Duration,
    thread_name: String,
    shutdown: Receiver<()>,
) {
    let ticker = crossbeam_channel::tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                shared.dispatch_idle(&thread_name);
            }
            recv(shutdown) -> _ => break,
        }
    }
}

/// Run a claimed flush.
///
/// The flush is isolated so a panicking writer only loses its own batch.
fn run_flush(logger: &AsyncLogger) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        logger.run_claimed_flush()
    }));

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => report_flush_error(logger.key(), &e),
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            eprintln!(
                "[LOGGER CRITICAL] Writer of '{}' panicked during flush: {}. \
                 Other loggers continue to flush.",
                logger.key(),
                panic_msg
            );
        }
    }
}

fn join_with_deadline(handle: JoinHandle<()>, deadline: Instant, timeout: Duration) -> bool {
    loop {
        if handle.is_finished() {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Flush ticker panicked during shutdown: {:?}", e);
                return false;
            }
            return true;
        }

        if Instant::now() >= deadline {
            eprintln!(
                "[LOGGER WARNING] Flush ticker did not finish within {:?} timeout. \
                 Some logs may be lost.",
                timeout
            );
            return false;
        }

        // Small sleep to avoid busy-waiting
        thread::sleep(Duration::from_millis(5));
    }
}

/// Builder for [`LoggerRegistry`]
///
/// # Example
///
/// ```
/// use rust_line_logger::LoggerRegistry;
/// use std::time::Duration;
///
/// let registry = LoggerRegistry::builder()
///     .tick_interval(Duration::from_millis(250))
///     .thread_name("audit-flush")
///     .build()
///     .unwrap();
/// assert_eq!(registry.config().thread_name, "audit-flush");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval_ms = interval.as_millis() as u64;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn build(self) -> Result<LoggerRegistry> {
        LoggerRegistry::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::async_logger::FlushStatus;
    use crate::writers::SharedBuffer;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let registry = LoggerRegistry::new();
        let first = registry
            .get_or_create(SharedBuffer::new(), "a", "", "orders")
            .unwrap();
        let second = registry
            .get_or_create(SharedBuffer::new(), "ignored", "%Y", "orders")
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.prefix(), "a");
        assert_eq!(registry.len(), 1);

        first.set_flush_interval(Duration::from_millis(250));
        assert_eq!(second.flush_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_reserved_key_is_rejected() {
        let registry = LoggerRegistry::new();
        let err = registry
            .get_or_create(SharedBuffer::new(), "", "", "_foo")
            .unwrap_err();

        assert!(matches!(err, LoggerError::ReservedKey { .. }));
        assert!(err.is_configuration());
        assert!(registry.is_empty());

        let err = registry
            .register_protected(SharedBuffer::new(), "", "", "_bar")
            .unwrap_err();
        assert!(matches!(err, LoggerError::ReservedKey { .. }));
    }

    #[test]
    fn test_protected_key_is_remapped() {
        let registry = LoggerRegistry::new();
        let protected_sink = SharedBuffer::new();
        let protected = registry
            .register_protected(protected_sink.clone(), "", "", "audit")
            .unwrap();

        let external_sink = SharedBuffer::new();
        let external = registry
            .get_or_create(external_sink.clone(), "", "", "audit")
            .unwrap();

        assert!(!Arc::ptr_eq(&protected, &external));
        assert_eq!(protected.key(), "audit");
        assert_eq!(external.key(), "_audit");
        assert!(registry.is_protected("audit"));
        assert_eq!(registry.keys(), vec!["_audit".to_string(), "audit".to_string()]);

        let looked_up = registry.get("audit").unwrap();
        assert!(Arc::ptr_eq(&looked_up, &external));
        let looked_up = registry.get_protected("audit").unwrap();
        assert!(Arc::ptr_eq(&looked_up, &protected));

        external.append("external").unwrap();
        protected.append("protected").unwrap();
        registry.flush_all().unwrap();
        assert_eq!(external_sink.contents(), "external\n");
        assert_eq!(protected_sink.contents(), "protected\n");
    }

    /// Writer whose writes block until the paired sender is dropped
    struct StuckWriter {
        release: crossbeam_channel::Receiver<()>,
    }

    impl Write for StuckWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let _ = self.release.recv();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn stuck_writer() -> (Sender<()>, StuckWriter) {
        let (release_tx, release_rx) = crossbeam_channel::unbounded();
        (release_tx, StuckWriter { release: release_rx })
    }

    fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while !done() {
            if start.elapsed() > deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        true
    }

    #[test]
    fn test_protecting_a_key_already_in_use_is_rejected() {
        let registry = LoggerRegistry::new();
        let external = registry
            .get_or_create(SharedBuffer::new(), "", "", "audit")
            .unwrap();

        let err = registry
            .register_protected(SharedBuffer::new(), "", "", "audit")
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(!registry.is_protected("audit"));
        assert!(registry.get_protected("audit").is_none());

        // Callers keep reaching the logger they created
        let looked_up = registry.get("audit").unwrap();
        assert!(Arc::ptr_eq(&looked_up, &external));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_protected_twice_returns_same_logger() {
        let registry = LoggerRegistry::new();
        let first = registry
            .register_protected(SharedBuffer::new(), "", "", "audit")
            .unwrap();
        let second = registry
            .register_protected(SharedBuffer::new(), "", "", "audit")
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_dispatch_skips_busy_loggers() {
        let registry = LoggerRegistry::new();
        let busy = registry
            .get_or_create(SharedBuffer::new(), "", "", "busy")
            .unwrap();
        let idle_sink = SharedBuffer::new();
        let idle = registry
            .get_or_create(idle_sink.clone(), "", "", "idle")
            .unwrap();
        idle.append("line").unwrap();

        assert!(busy.claim_flush(false));
        assert_eq!(registry.shared.dispatch_idle("test-flush"), 1);
        assert!(wait_until(Duration::from_secs(5), || {
            idle.status() == FlushStatus::Idle && !idle_sink.is_empty()
        }));
        assert_eq!(idle_sink.contents(), "line\n");
        assert_eq!(busy.status(), FlushStatus::Flushing);

        busy.run_claimed_flush().unwrap();
        assert!(wait_until(Duration::from_secs(5), || {
            idle.status() == FlushStatus::Idle
        }));
        assert_eq!(registry.shared.dispatch_idle("test-flush"), 2);
    }

    #[test]
    fn test_stuck_writers_do_not_stall_other_loggers() {
        let registry = LoggerRegistry::builder()
            .tick_interval(Duration::from_millis(20))
            .build()
            .unwrap();
        let (release_a, stuck_a) = stuck_writer();
        let (release_b, stuck_b) = stuck_writer();
        let first = registry.get_or_create(stuck_a, "", "", "stuck-a").unwrap();
        let second = registry.get_or_create(stuck_b, "", "", "stuck-b").unwrap();
        let healthy_sink = SharedBuffer::new();
        let healthy = registry
            .get_or_create(healthy_sink.clone(), "", "", "healthy")
            .unwrap();
        registry.start().unwrap();

        first.append("blocked").unwrap();
        second.append("blocked").unwrap();
        assert!(wait_until(Duration::from_secs(5), || {
            first.status() == FlushStatus::Flushing && second.status() == FlushStatus::Flushing
        }));

        healthy.append("hello").unwrap();
        assert!(wait_until(Duration::from_secs(2), || !healthy_sink.is_empty()));
        assert_eq!(healthy_sink.contents(), "hello\n");

        drop(release_a);
        drop(release_b);
        assert!(registry.stop(Duration::from_secs(5)));
    }

    #[test]
    fn test_stop_is_bounded_by_timeout_with_stuck_writer() {
        let registry = LoggerRegistry::builder()
            .tick_interval(Duration::from_millis(10))
            .build()
            .unwrap();
        let (release, stuck) = stuck_writer();
        let logger = registry.get_or_create(stuck, "", "", "stuck").unwrap();
        let healthy_sink = SharedBuffer::new();
        let healthy = registry
            .get_or_create(healthy_sink.clone(), "", "", "healthy")
            .unwrap();
        registry.start().unwrap();

        logger.append("blocked").unwrap();
        assert!(wait_until(Duration::from_secs(5), || {
            logger.status() == FlushStatus::Flushing && logger.pending_lines() == 0
        }));
        logger.append("left behind").unwrap();
        healthy.append("written at stop").unwrap();

        let started = Instant::now();
        assert!(!registry.stop(Duration::from_millis(100)));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!registry.is_running());
        assert_eq!(healthy_sink.contents(), "written at stop\n");
        assert_eq!(logger.pending_lines(), 1);

        drop(release);
        assert!(wait_until(Duration::from_secs(5), || {
            logger.status() == FlushStatus::Idle
        }));
    }

    #[test]
    fn test_background_flush() {
        let registry = LoggerRegistry::builder()
            .tick_interval(Duration::from_millis(20))
            .build()
            .unwrap();
        registry.start().unwrap();
        assert!(registry.is_running());

        let sink = SharedBuffer::new();
        let logger = registry.get_or_create(sink.clone(), "", "", "bg").unwrap();
        logger.append("hello").unwrap();
        logger.append("world").unwrap();

        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(sink.contents(), "hello\nworld\n");

        assert!(registry.stop(Duration::from_secs(2)));
        assert!(!registry.is_running());
    }

    #[test]
    fn test_stop_flushes_pending_lines() {
        let registry = LoggerRegistry::builder()
            .tick_interval(Duration::from_secs(60))
            .build()
            .unwrap();
        registry.start().unwrap();

        let sink = SharedBuffer::new();
        let logger = registry.get_or_create(sink.clone(), "", "", "late").unwrap();
        logger.append("appended after the last tick").unwrap();

        assert!(registry.stop(Duration::from_secs(2)));
        assert_eq!(sink.contents(), "appended after the last tick\n");
    }

    #[test]
    fn test_start_is_idempotent() {
        let registry = LoggerRegistry::new();
        registry.start().unwrap();
        registry.start().unwrap();
        assert!(registry.stop(Duration::from_secs(2)));
        // Stopping a stopped registry only flushes
        assert!(registry.stop(Duration::from_secs(2)));
    }

    #[test]
    fn test_flush_all_reports_failure_but_flushes_others() {
        let registry = LoggerRegistry::new();
        let broken_sink = SharedBuffer::new();
        broken_sink.fail_writes(true);
        let broken = registry
            .get_or_create(broken_sink.clone(), "", "", "broken")
            .unwrap();
        let healthy_sink = SharedBuffer::new();
        let healthy = registry
            .get_or_create(healthy_sink.clone(), "", "", "healthy")
            .unwrap();

        broken.append("lost").unwrap();
        healthy.append("kept").unwrap();

        assert!(registry.flush_all().is_err());
        assert_eq!(healthy_sink.contents(), "kept\n");
        assert_eq!(broken.metrics().lines_lost(), 1);
    }

    #[test]
    fn test_config_validation() {
        assert!(RegistryConfig::default().validate().is_ok());

        let err = LoggerRegistry::builder().thread_name("").build().unwrap_err();
        assert!(err.is_configuration());

        let err = LoggerRegistry::builder()
            .tick_interval(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_config_deserialization_fills_defaults() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"tick_interval_ms": 250}"#).expect("deserialize config");
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.thread_name, RegistryConfig::default().thread_name);
        assert_eq!(config.shutdown_timeout(), DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
