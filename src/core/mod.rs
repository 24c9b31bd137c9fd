//! Core logger types and traits

pub mod async_logger;
pub mod duration_logger;
pub mod error;
pub mod leveled_logger;
pub mod line_logger;
pub mod log_level;
pub mod metrics;
pub mod output;
pub mod registry;
pub mod sampling;
pub mod timestamp;

pub use async_logger::{AsyncLogger, FlushStatus, DEFAULT_FLUSH_INTERVAL};
pub use duration_logger::{DurationLogger, DEFAULT_GATE_DURATION};
pub use error::{LoggerError, Result};
pub use leveled_logger::LeveledLogger;
pub use line_logger::{LineFormat, LineLogger};
pub use log_level::LogLevel;
pub use metrics::LoggerMetrics;
pub use output::Output;
pub use registry::{
    LoggerRegistry, RegistryBuilder, RegistryConfig, DEFAULT_SHUTDOWN_TIMEOUT,
    DEFAULT_TICK_INTERVAL, RESERVED_KEY_PREFIX,
};
pub use sampling::{SamplerMetrics, WriteSampler, ALWAYS_WRITE};
pub use timestamp::TimestampFormat;
