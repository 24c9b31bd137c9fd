//! File logging example
//!
//! Demonstrates buffered logging to a file alongside an unbuffered console
//! logger, with a protected key the rest of the program cannot reach.
//!
//! Run with: cargo run --example file_logging

use rust_line_logger::prelude::*;
use rust_line_logger::writers::FileWriter;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Line Logger - File Logging Example ===\n");

    let registry = LoggerRegistry::new();
    registry.start()?;

    let file = registry.get_or_create(
        FileWriter::open("application.log")?,
        "[app]",
        TimestampFormat::Iso8601Millis,
        "application",
    )?;
    let console = registry.get_or_create(ConsoleWriter::stderr(), "[app]", "", "console")?;
    console.set_buffered(false)?;

    println!("1. Logging to both console and file:");
    for message in [
        "Application started",
        "Configuration loaded successfully",
        "Database connection established",
    ] {
        file.output(message)?;
        console.output(message)?;
    }

    println!("\n2. Protected logger:");
    let audit = registry.register_protected(
        FileWriter::open("audit.log")?,
        "[audit]",
        TimestampFormat::Rfc3339,
        "audit",
    )?;
    audit.output("Audit trail opened")?;

    // Callers asking for "audit" get a separate logger
    let impostor = registry.get_or_create(ConsoleWriter::stderr(), "[impostor]", "", "audit")?;
    impostor.output("This never reaches audit.log")?;
    println!("   Registered keys: {:?}", registry.keys());

    println!("\n3. Severity filter over the file logger:");
    let leveled = LeveledLogger::new(file.clone(), LogLevel::Warn);
    leveled.info("Routine detail (hidden)")?;
    leveled.warn("Using default settings for some options")?;
    leveled.error("Failed to load optional plugin")?;

    registry.stop(Duration::from_secs(5));

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'audit.log' for the file output");

    Ok(())
}
