/* src/metrics.rs */
//! Structured metrics emitted through `tracing`.
//!
//! Counters keep an atomic running total; histograms only log observations and
//! leave aggregation to whatever subscriber is installed.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

/// Monotonic event count, e.g. vectors generated or documents processed.
/// Each increment is also reported as a `trace` event.
#[derive(Debug)]
pub struct Counter {
    name: &'static str,
    value: AtomicU64,
}

impl Counter {
    /// Zeroed counter; `const` so it can back a `static`.
    pub const fn new(name: &'static str) -> Self {
        Self { name, value: AtomicU64::new(0) }
    }

    /// Adds `delta` and logs the new total.
    pub fn increment(&self, delta: u64) {
        let new_value = self.value.fetch_add(delta, Ordering::Relaxed) + delta;
        trace!(
            metric_type = "counter",
            metric_name = self.name,
            value = new_value,
            delta,
            "Counter incremented"
        );
    }

    /// Current total.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Timing or size observations (table build and convolution latencies).
/// Nothing is stored; each value goes out as a `debug` event.
#[derive(Debug)]
pub struct Histogram {
    name: &'static str,
}

impl Histogram {
    /// Named histogram; `const` so it can back a `static`.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Records a single observation.
    pub fn record(&self, value: f64) {
        debug!(
            metric_type = "histogram",
            metric_name = self.name,
            value,
            "Histogram value recorded"
        );
    }
}

/// `counter!("name")` expands to a reference to a `static Counter` private to
/// that expansion, so two call sites with the same name keep separate totals.
macro_rules! counter {
    ($name:expr) => {{
        static COUNTER: $crate::metrics::Counter = $crate::metrics::Counter::new($name);
        &COUNTER
    }};
}

/// `histogram!("name")` expands to a reference to a `static Histogram` private
/// to that expansion.
macro_rules! histogram {
    ($name:expr) => {{
        static HISTOGRAM: $crate::metrics::Histogram = $crate::metrics::Histogram::new($name);
        &HISTOGRAM
    }};
}

pub(crate) use counter;
pub(crate) use histogram;
