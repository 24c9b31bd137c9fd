//! Formatting macros over [`Output`](crate::Output) and
//! [`LeveledLogger`](crate::LeveledLogger).
//!
//! Each macro formats its arguments like `format!` and evaluates to the
//! `Result` of the underlying call.
//!
//! # Examples
//!
//! ```
//! use rust_line_logger::prelude::*;
//! use rust_line_logger::{output, warn};
//!
//! let sink = SharedBuffer::new();
//! let logger = LeveledLogger::new(LineLogger::new(sink.clone(), "", ""), LogLevel::Info);
//!
//! let port = 8080;
//! output!(logger.inner(), "listening on port {}", port).unwrap();
//! warn!(logger, "retry attempt {} of {}", 3, 5).unwrap();
//!
//! assert_eq!(sink.contents(), "listening on port 8080\n[WARN] retry attempt 3 of 5\n");
//! ```

/// Format a message and pass it to any [`Output`](crate::Output).
///
/// # Examples
///
/// ```
/// # use rust_line_logger::prelude::*;
/// # let logger = LineLogger::new(SharedBuffer::new(), "", "");
/// use rust_line_logger::output;
/// output!(logger, "Simple message").unwrap();
/// output!(logger, "Status code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! output {
    ($logger:expr, $($arg:tt)+) => {
        $crate::core::output::Output::output(&$logger, &format!($($arg)+))
    };
}

/// Log a formatted message at a given level through a
/// [`LeveledLogger`](crate::LeveledLogger).
///
/// # Examples
///
/// ```
/// # use rust_line_logger::prelude::*;
/// # let logger = LeveledLogger::new(LineLogger::new(SharedBuffer::new(), "", ""), LogLevel::All);
/// use rust_line_logger::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_line_logger::prelude::*;
/// # let logger = LeveledLogger::new(LineLogger::new(SharedBuffer::new(), "", ""), LogLevel::Warn);
/// use rust_line_logger::warn;
/// warn!(logger, "Low disk space").unwrap();
/// warn!(logger, "Retry attempt {} of {}", 3, 5).unwrap();
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
