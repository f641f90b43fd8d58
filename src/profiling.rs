//! Outcome and timing counters for address resolution.

use crate::resolver::Resolution;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Lock-free counters shared by every call on one [`AddressResolver`].
///
/// [`AddressResolver`]: crate::AddressResolver
#[derive(Debug)]
pub struct ResolutionProfiler {
    start_time: Instant,
    matched: AtomicUsize,
    ambiguous: AtomicUsize,
    no_candidates: AtomicUsize,
    lookup_failures: AtomicUsize,
    total_lookup_time: AtomicUsize,  // microseconds
    total_resolve_time: AtomicUsize, // microseconds
}

impl ResolutionProfiler {
    /// Create a new profiler
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            matched: AtomicUsize::new(0),
            ambiguous: AtomicUsize::new(0),
            no_candidates: AtomicUsize::new(0),
            lookup_failures: AtomicUsize::new(0),
            total_lookup_time: AtomicUsize::new(0),
            total_resolve_time: AtomicUsize::new(0),
        }
    }

    /// Record how long a candidate lookup took
    pub fn record_lookup(&self, duration: Duration) {
        self.total_lookup_time
            .fetch_add(duration.as_micros() as usize, Ordering::Relaxed);
    }

    /// Record a lookup that failed
    pub fn record_lookup_failure(&self) {
        self.lookup_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished resolution and how long scoring took
    pub fn record_resolution(&self, resolution: &Resolution, duration: Duration) {
        let counter = match resolution {
            Resolution::Matched(_) => &self.matched,
            Resolution::Ambiguous { .. } => &self.ambiguous,
            Resolution::NoCandidates => &self.no_candidates,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_resolve_time
            .fetch_add(duration.as_micros() as usize, Ordering::Relaxed);
    }

    /// Get a snapshot of the counters
    pub fn summary(&self) -> ResolutionSummary {
        let matched = self.matched.load(Ordering::Relaxed);
        let ambiguous = self.ambiguous.load(Ordering::Relaxed);
        let no_candidates = self.no_candidates.load(Ordering::Relaxed);
        let lookup_failures = self.lookup_failures.load(Ordering::Relaxed);
        let resolutions = matched + ambiguous + no_candidates;
        let lookups = resolutions + lookup_failures;

        let average = |total_us: usize, count: usize| {
            if count > 0 {
                Duration::from_micros((total_us / count) as u64)
            } else {
                Duration::ZERO
            }
        };

        ResolutionSummary {
            matched,
            ambiguous,
            no_candidates,
            lookup_failures,
            total_runtime: self.start_time.elapsed(),
            average_lookup_time: average(self.total_lookup_time.load(Ordering::Relaxed), lookups),
            average_resolve_time: average(
                self.total_resolve_time.load(Ordering::Relaxed),
                resolutions,
            ),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.matched,
            &self.ambiguous,
            &self.no_candidates,
            &self.lookup_failures,
            &self.total_lookup_time,
            &self.total_resolve_time,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for ResolutionProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of resolution outcomes
#[derive(Debug, Clone)]
pub struct ResolutionSummary {
    /// Resolutions that accepted one candidate
    pub matched: usize,
    /// Resolutions left ambiguous
    pub ambiguous: usize,
    /// Resolutions with nothing to choose from
    pub no_candidates: usize,
    /// Lookups that failed before resolution
    pub lookup_failures: usize,
    /// Time since the profiler was created
    pub total_runtime: Duration,
    /// Average time per lookup, failed ones included
    pub average_lookup_time: Duration,
    /// Average time spent scoring and deciding
    pub average_resolve_time: Duration,
}

impl ResolutionSummary {
    /// Number of completed resolutions
    pub fn total_resolutions(&self) -> usize {
        self.matched + self.ambiguous + self.no_candidates
    }

    /// Share of completed resolutions that found a match, in `[0, 1]`
    pub fn match_rate(&self) -> f64 {
        match self.total_resolutions() {
            0 => 0.0,
            total => self.matched as f64 / total as f64,
        }
    }

    /// Calculate resolutions per second
    pub fn resolutions_per_second(&self) -> f64 {
        if self.total_runtime.as_secs_f64() > 0.0 {
            self.total_resolutions() as f64 / self.total_runtime.as_secs_f64()
        } else {
            0.0
        }
    }
}
