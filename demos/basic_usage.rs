//! Basic logger usage example
//!
//! Demonstrates synchronous line logging, severity filtering and the
//! duration gate on the console.
//!
//! Run with: cargo run --example basic_usage

use rust_line_logger::prelude::*;
use rust_line_logger::{info, output, DurationLogger};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Line Logger - Basic Usage Example ===\n");

    // One line per call: "[prefix] [timestamp] message"
    let logger = LineLogger::new(ConsoleWriter::stdout(), "[basic]", TimestampFormat::Rfc3339);

    println!("1. Plain lines:");
    logger.output("This is a line")?;
    output!(logger, "Formatted line: {} + {} = {}", 2, 2, 4)?;

    println!("\n2. Changing the header at runtime:");
    logger.set_prefix("[renamed]");
    logger.set_time_format("%H:%M:%S");
    logger.output("Same logger, new header")?;

    println!("\n3. Severity filtering (threshold WARN):");
    let leveled = LeveledLogger::new(
        LineLogger::new(ConsoleWriter::stdout(), "", ""),
        LogLevel::Warn,
    );
    leveled.debug("Debug message (hidden)")?;
    info!(leveled, "Info message (hidden)")?;
    leveled.warn("Warning message (visible)")?;
    leveled.error("Error message (visible)")?;

    leveled.set_level(LogLevel::All);
    leveled.debug("Debug message (visible after lowering the threshold)")?;

    println!("\n4. Duration gate (one line per 100ms):");
    let gated = DurationLogger::line(ConsoleWriter::stdout(), "[gated]", "")
        .with_duration(Duration::from_millis(100));
    for i in 0..10 {
        gated.output(&format!("Attempt {}", i))?;
        thread::sleep(Duration::from_millis(30));
    }
    println!("   {} lines suppressed", gated.suppressed_count());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
