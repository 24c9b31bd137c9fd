//! Write-probability sampling for high-volume loggers
//!
//! A logger with a probability below 1.0 keeps each line independently with
//! that probability and silently drops the rest. Dropped lines are not
//! errors; they are only visible through [`SamplerMetrics`].
//!
//! # Example
//!
//! ```
//! use rust_line_logger::WriteSampler;
//!
//! let sampler = WriteSampler::new(0.0);
//! assert!(!sampler.should_write());
//!
//! sampler.set_probability(1.0);
//! assert!(sampler.should_write());
//! ```

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Probability meaning "always write"
pub const ALWAYS_WRITE: f64 = 1.0;

/// Metrics for sampling observability
#[derive(Debug)]
pub struct SamplerMetrics {
    /// Number of lines that passed sampling
    sampled_count: AtomicU64,

    /// Number of lines dropped by sampling
    dropped_count: AtomicU64,
}

impl SamplerMetrics {
    pub const fn new() -> Self {
        Self {
            sampled_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn sampled_count(&self) -> u64 {
        self.sampled_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.sampled_count() + self.dropped_count()
    }

    #[inline]
    pub(crate) fn record_sampled(&self) {
        self.sampled_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Fraction of lines actually kept; 1.0 before any line was seen
    pub fn effective_sample_rate(&self) -> f64 {
        let total = self.total_count() as f64;
        if total == 0.0 {
            1.0
        } else {
            self.sampled_count() as f64 / total
        }
    }

    pub fn reset(&self) {
        self.sampled_count.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
    }
}

impl Default for SamplerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-logger sampling gate
///
/// The probability is stored as raw `f64` bits in an atomic so it can be
/// changed while other threads are appending.
#[derive(Debug)]
pub struct WriteSampler {
    probability: AtomicU64,
    metrics: SamplerMetrics,
}

impl WriteSampler {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: AtomicU64::new(normalize(probability).to_bits()),
            metrics: SamplerMetrics::new(),
        }
    }

    /// A sampler that keeps every line
    pub fn always() -> Self {
        Self::new(ALWAYS_WRITE)
    }

    pub fn probability(&self) -> f64 {
        f64::from_bits(self.probability.load(Ordering::Relaxed))
    }

    /// Change the keep probability; NaN is treated as "always write"
    pub fn set_probability(&self, probability: f64) {
        self.probability
            .store(normalize(probability).to_bits(), Ordering::Relaxed);
    }

    /// Decide whether the next line is kept
    ///
    /// A uniform draw in `[0, 1)` greater than the probability drops the line.
    pub fn should_write(&self) -> bool {
        let probability = self.probability();

        let keep = if probability >= ALWAYS_WRITE {
            true
        } else if probability <= 0.0 {
            false
        } else {
            rand::thread_rng().gen::<f64>() <= probability
        };

        if keep {
            self.metrics.record_sampled();
        } else {
            self.metrics.record_dropped();
        }
        keep
    }

    pub fn metrics(&self) -> &SamplerMetrics {
        &self.metrics
    }
}

impl Default for WriteSampler {
    fn default() -> Self {
        Self::always()
    }
}

fn normalize(probability: f64) -> f64 {
    if probability.is_nan() {
        ALWAYS_WRITE
    } else {
        probability
    }
}
