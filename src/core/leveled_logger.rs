//! Severity filter over any [`Output`]

use super::error::Result;
use super::log_level::LogLevel;
use super::output::Output;
use parking_lot::RwLock;

/// Forwards messages at or above a threshold to the inner output, tagged
/// with their level (`[WARN] disk almost full`); anything below the
/// threshold is dropped without side effects.
///
/// The inner output can be a [`LineLogger`](super::line_logger::LineLogger),
/// an [`AsyncLogger`](super::async_logger::AsyncLogger), a
/// [`DurationLogger`](super::duration_logger::DurationLogger) or anything
/// else implementing [`Output`].
///
/// # Example
///
/// ```
/// use rust_line_logger::{LeveledLogger, LineLogger, LogLevel};
/// use rust_line_logger::writers::SharedBuffer;
///
/// let sink = SharedBuffer::new();
/// let logger = LeveledLogger::new(LineLogger::new(sink.clone(), "", ""), LogLevel::Warn);
///
/// logger.info("cache warmed").unwrap();
/// logger.warn("disk almost full").unwrap();
/// assert_eq!(sink.contents(), "[WARN] disk almost full\n");
/// ```
pub struct LeveledLogger<O: Output> {
    inner: O,
    threshold: RwLock<LogLevel>,
    #[cfg(feature = "console")]
    use_colors: bool,
}

impl<O: Output> LeveledLogger<O> {
    pub fn new(inner: O, threshold: LogLevel) -> Self {
        Self {
            inner,
            threshold: RwLock::new(threshold),
            #[cfg(feature = "console")]
            use_colors: false,
        }
    }

    /// Colour the level tag with ANSI escapes
    #[cfg(feature = "console")]
    #[must_use = "builder methods return a new value"]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn set_level(&self, threshold: LogLevel) {
        *self.threshold.write() = threshold;
    }

    pub fn level(&self) -> LogLevel {
        *self.threshold.read()
    }

    /// Whether a message at `level` would be forwarded
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.is_severity() && level >= self.level()
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Forward `message` if `level` passes the threshold.
    ///
    /// `All` and `Off` are thresholds, not severities; logging at them does
    /// nothing.
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) -> Result<()> {
        if !self.is_enabled(level) {
            return Ok(());
        }
        let Some(tag) = level.tag() else {
            return Ok(());
        };

        let message = message.as_ref();
        let mut line = String::with_capacity(tag.len() + 1 + message.len());
        self.push_tag(&mut line, level, tag);
        line.push(' ');
        line.push_str(message);
        self.inner.output(&line)
    }

    #[cfg(feature = "console")]
    fn push_tag(&self, line: &mut String, level: LogLevel, tag: &str) {
        if self.use_colors {
            use colored::Colorize;
            line.push_str(&tag.color(level.color_code()).to_string());
        } else {
            line.push_str(tag);
        }
    }

    #[cfg(not(feature = "console"))]
    fn push_tag(&self, line: &mut String, _level: LogLevel, tag: &str) {
        line.push_str(tag);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    /// Fatal messages are only logged; the process keeps running
    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }
}
