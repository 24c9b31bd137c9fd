//! Error types for the line logger

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Errors surfaced to callers.
///
/// Dropped lines (sampling, duration gate, level filter) are not errors.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// I/O failure outside the write path, e.g. spawning a flush thread
    #[error("I/O failure while {operation} ({message})")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Error returned by the destination writer
    #[error("Writer failed: {0}")]
    IoError(#[from] std::io::Error),

    /// Registry key uses the reserved leading character
    #[error("Registry key '{key}' starts with the reserved character '{reserved}'")]
    ReservedKey { key: String, reserved: char },

    #[error("{component} rejected its configuration: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Destination file could not be opened or synced
    #[error("Cannot use log file '{path}': {message}")]
    FileWriterError { path: String, message: String },
}

impl LoggerError {
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn reserved_key(key: impl Into<String>, reserved: char) -> Self {
        LoggerError::ReservedKey {
            key: key.into(),
            reserved,
        }
    }

    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn file_writer(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileWriterError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error comes from a programming mistake rather than a
    /// runtime condition
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::ReservedKey { .. } | LoggerError::InvalidConfiguration { .. }
        )
    }
}
