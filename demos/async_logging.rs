//! Async logging example
//!
//! Demonstrates buffered loggers flushed by a registry's background ticker
//! while several threads log concurrently.
//!
//! Run with: cargo run --example async_logging

use rust_line_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Line Logger - Async Logging Example ===\n");

    let registry = LoggerRegistry::builder()
        .tick_interval(Duration::from_millis(100))
        .build()?;
    registry.start()?;

    let logger = registry.get_or_create(ConsoleWriter::stdout(), "[async]", "%H:%M:%S%.3f", "app")?;

    println!("1. Buffered logging:");
    for i in 0..10 {
        logger.output(&format!("Message #{}", i))?;
    }
    println!("   Appended 10 lines; {} pending", logger.pending_lines());
    logger.flush()?;

    println!("\n2. Multi-threaded logging:");
    let mut handles = vec![];
    for thread_id in 0..5 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..5 {
                let _ = logger.output(&format!("Thread {} - Message {}", thread_id, i));
                thread::sleep(Duration::from_millis(10));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    println!("\n3. JSON lines:");
    let events = registry.get_or_create(ConsoleWriter::stdout(), "", "", "events")?;
    events.append_json(&serde_json::json!({"event": "login", "user": "alice"}))?;
    events.append_json(&serde_json::json!({"event": "logout", "user": "alice"}))?;

    println!("\n4. Sampling (10% of lines kept):");
    let sampled = registry.get_or_create(ConsoleWriter::stdout(), "[sampled]", "", "sampled")?;
    sampled.set_write_probability(0.1);
    for i in 0..50 {
        sampled.output(&format!("Sampled line {}", i))?;
    }

    // Stop the ticker and flush whatever is still buffered
    if !registry.stop(Duration::from_secs(5)) {
        eprintln!("Registry did not stop cleanly");
    }

    let metrics = sampled.sampler().metrics();
    println!(
        "\n   Sampled {} of {} lines",
        metrics.sampled_count(),
        metrics.total_count()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
