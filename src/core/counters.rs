//! Monotonic counters for load outcomes.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Internal atomic counter set, one instance per loader.
#[derive(Debug, Default)]
pub struct LoadCounters {
    total_attempts: AtomicU64,
    successful_loads: AtomicU64,
    partial_loads: AtomicU64,
    failed_loads: AtomicU64,
    security_violations: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl LoadCounters {
    /// Count a new load attempt.
    pub fn record_attempt(&self) {
        self.total_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a fully successful load.
    pub fn record_success(&self) {
        self.successful_loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a partial load.
    pub fn record_partial(&self) {
        self.partial_loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed load.
    pub fn record_failure(&self) {
        self.failed_loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a rejected identifier or containment violation.
    pub fn record_security_violation(&self) {
        self.security_violations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a cache hit.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a cache miss.
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Current security-violation count.
    pub fn security_violations(&self) -> u64 {
        self.security_violations.load(Ordering::Relaxed)
    }

    /// Consistent-enough snapshot for the statistics report.
    pub fn snapshot(&self) -> LoadStatistics {
        LoadStatistics {
            total_attempts: self.total_attempts.load(Ordering::Relaxed),
            successful_loads: self.successful_loads.load(Ordering::Relaxed),
            partial_loads: self.partial_loads.load(Ordering::Relaxed),
            failed_loads: self.failed_loads.load(Ordering::Relaxed),
            security_violations: self.security_violations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the load counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStatistics {
    /// Total load attempts, including rejected and failed ones
    pub total_attempts: u64,
    /// Loads where all four sub-contexts parsed
    pub successful_loads: u64,
    /// Loads where at least one but not all sub-contexts parsed
    pub partial_loads: u64,
    /// Loads that failed outright
    pub failed_loads: u64,
    /// Identifier containment and traversal violations
    pub security_violations: u64,
    /// Bundles served from cache
    pub cache_hits: u64,
    /// Lookups that had to read the filesystem
    pub cache_misses: u64,
}

impl LoadStatistics {
    /// Cache hit rate over all cache consultations so far.
    pub fn hit_rate(&self) -> f64 {
        self.cache_hits as f64 / (self.cache_hits + self.cache_misses).max(1) as f64
    }
}
