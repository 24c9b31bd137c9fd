//! Append-mode file writer

use crate::core::{LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Destination writer that appends to a file, creating it when missing
///
/// Writes go straight to the file handle, so each logger write or flush
/// reaches the OS as one `write_all`. Rotation is left to whoever owns the
/// path.
///
/// # Example
///
/// ```no_run
/// use rust_line_logger::writers::FileWriter;
/// use rust_line_logger::LineLogger;
///
/// let file = FileWriter::open("/var/log/app.log").unwrap();
/// let logger = LineLogger::new(file, "app", "%Y-%m-%dT%H:%M:%S%:z");
/// ```
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
    file: File,
}

impl FileWriter {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::file_writer(path.display().to_string(), e.to_string()))?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ask the OS to persist written data
    pub fn sync(&self) -> Result<()> {
        self.file.sync_data().map_err(|e| {
            LoggerError::io_operation("syncing log file", self.path.display().to_string(), e)
        })
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_appends_to_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("append.log");
        std::fs::write(&path, "existing\n").unwrap();

        let mut writer = FileWriter::open(&path).expect("Failed to open writer");
        writer.write_all(b"appended\n").unwrap();
        writer.sync().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing\nappended\n");
        assert_eq!(writer.path(), path.as_path());
    }

    #[test]
    fn test_open_failure_reports_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("missing-dir").join("app.log");

        let err = FileWriter::open(&path).unwrap_err();
        assert!(matches!(err, LoggerError::FileWriterError { .. }));
        assert!(err.to_string().contains("missing-dir"));
    }
}
