//! Ready-made destination writers
//!
//! Loggers accept any `std::io::Write + Send`; these cover the common
//! destinations.

pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

pub use console::{ConsoleTarget, ConsoleWriter};
#[cfg(feature = "file")]
pub use file::FileWriter;
pub use memory::SharedBuffer;
