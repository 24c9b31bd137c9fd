//! Base line formatter and the synchronous logger built on it

use super::error::Result;
use super::output::Output;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;
use std::fmt::{self, Display};
use std::io::Write;

/// Header layout shared by every logger in the crate
///
/// A rendered line is `[prefix ][timestamp ]body\n`, where each bracketed
/// part is only present when configured.
///
/// # Example
///
/// ```
/// use rust_line_logger::LineFormat;
///
/// let format = LineFormat::new("worker-1", "");
/// assert_eq!(format.render("started"), "worker-1 started\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFormat {
    prefix: String,
    timestamp_format: TimestampFormat,
}

impl LineFormat {
    pub fn new(prefix: impl Into<String>, timestamp_format: impl Into<TimestampFormat>) -> Self {
        Self {
            prefix: prefix.into(),
            timestamp_format: timestamp_format.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    pub fn set_timestamp_format(&mut self, format: impl Into<TimestampFormat>) {
        self.timestamp_format = format.into();
    }

    /// Append the header for a line stamped at `now`
    pub fn write_header<Tz>(&self, buf: &mut Vec<u8>, now: &DateTime<Tz>)
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if !self.prefix.is_empty() {
            buf.extend_from_slice(self.prefix.as_bytes());
            buf.push(b' ');
        }

        if let Some(timestamp) = self.timestamp_format.format(now) {
            buf.extend_from_slice(timestamp.as_bytes());
            buf.push(b' ');
        }
    }

    /// Append a complete line (header, body, newline) to `buf`
    pub fn render_into<Tz>(&self, buf: &mut Vec<u8>, now: &DateTime<Tz>, body: &[u8])
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.write_header(buf, now);
        buf.extend_from_slice(body);
        if body.last() != Some(&b'\n') {
            buf.push(b'\n');
        }
    }

    /// Render a line stamped with the current local time
    pub fn render(&self, body: &str) -> String {
        let mut buf = Vec::with_capacity(self.prefix.len() + body.len() + 32);
        self.render_into(&mut buf, &Local::now(), body.as_bytes());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

struct LineState {
    format: LineFormat,
    out: Box<dyn Write + Send>,
    buf: Vec<u8>,
}

/// Synchronous logger: every call formats one line and writes it to the
/// destination in a single `write_all` under the logger's lock.
///
/// # Example
///
/// ```
/// use rust_line_logger::{LineLogger, Output};
/// use rust_line_logger::writers::SharedBuffer;
///
/// let sink = SharedBuffer::new();
/// let logger = LineLogger::new(sink.clone(), "", "");
/// logger.output("hello").unwrap();
/// assert_eq!(sink.contents(), "hello\n");
/// ```
pub struct LineLogger {
    state: Mutex<LineState>,
}

impl LineLogger {
    pub fn new<W>(out: W, prefix: impl Into<String>, time_format: impl Into<TimestampFormat>) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::with_format(out, LineFormat::new(prefix, time_format))
    }

    pub fn with_format<W: Write + Send + 'static>(out: W, format: LineFormat) -> Self {
        Self {
            state: Mutex::new(LineState {
                format,
                out: Box::new(out),
                buf: Vec::with_capacity(256),
            }),
        }
    }

    pub fn prefix(&self) -> String {
        self.state.lock().format.prefix().to_string()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.state.lock().format.set_prefix(prefix);
    }

    pub fn time_format(&self) -> TimestampFormat {
        self.state.lock().format.timestamp_format().clone()
    }

    pub fn set_time_format(&self, format: impl Into<TimestampFormat>) {
        self.state.lock().format.set_timestamp_format(format);
    }

    /// Replace the destination writer
    pub fn set_writer<W: Write + Send + 'static>(&self, out: W) {
        self.state.lock().out = Box::new(out);
    }

    /// Flush the destination writer
    pub fn flush(&self) -> Result<()> {
        self.state.lock().out.flush()?;
        Ok(())
    }

    fn write_line(&self, body: &[u8]) -> Result<()> {
        // Stamp before waiting on the lock
        let now = Local::now();

        let mut state = self.state.lock();
        let LineState { format, out, buf } = &mut *state;
        buf.clear();
        format.render_into(buf, &now, body);
        out.write_all(buf)?;
        Ok(())
    }
}

impl Output for LineLogger {
    fn output(&self, line: &str) -> Result<()> {
        self.write_line(line.as_bytes())
    }

    fn output_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.write_line(bytes)
    }
}

impl fmt::Debug for LineLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LineLogger")
            .field("format", &state.format)
            .finish_non_exhaustive()
    }
}
