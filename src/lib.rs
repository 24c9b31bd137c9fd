//! # Rust Line Logger
//!
//! Line-oriented logging built from small compositions over one capability,
//! [`Output`]:
//!
//! - **[`LineLogger`]**: formats `[prefix ][timestamp ]message\n` and writes
//!   each line in one call
//! - **[`AsyncLogger`]**: buffers lines in memory; a [`LoggerRegistry`]
//!   flushes every registered logger from a background ticker
//! - **[`DurationLogger`]**: lets at most one line through per interval
//! - **[`LeveledLogger`]**: forwards only messages at or above a severity
//!
//! Buffered lines are held in memory until flushed. Call
//! [`LoggerRegistry::stop`] on graceful shutdown; a crash loses whatever has
//! not been flushed yet.

pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        AsyncLogger, DurationLogger, FlushStatus, LeveledLogger, LineFormat, LineLogger,
        LogLevel, LoggerError, LoggerMetrics, LoggerRegistry, Output, RegistryBuilder,
        RegistryConfig, Result, TimestampFormat,
    };
    pub use crate::writers::{ConsoleWriter, SharedBuffer};
}

pub use core::{
    AsyncLogger, DurationLogger, FlushStatus, LeveledLogger, LineFormat, LineLogger, LogLevel,
    LoggerError, LoggerMetrics, LoggerRegistry, Output, RegistryBuilder, RegistryConfig, Result,
    SamplerMetrics, TimestampFormat, WriteSampler, DEFAULT_FLUSH_INTERVAL, DEFAULT_GATE_DURATION,
    DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_TICK_INTERVAL, RESERVED_KEY_PREFIX,
};
