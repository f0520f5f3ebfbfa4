//! Observable reports: the statistics snapshot and the directory probe
//! result.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::breaker::BreakerState;
use crate::core::counters::LoadStatistics;

/// Derived service health label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Normal operation
    Healthy,
    /// Circuit breaker is open
    Degraded,
    /// Circuit breaker is half-open
    Recovering,
    /// More than ten security violations observed
    SecurityAlert,
    /// Every concurrency permit is in use
    HighLoad,
}

impl HealthStatus {
    /// Derive the health label from current service state.
    ///
    /// Breaker state dominates, then security pressure, then load pressure.
    pub fn derive(
        breaker: BreakerState,
        security_violations: u64,
        active_loads: usize,
        max_concurrent_loads: usize,
    ) -> Self {
        match breaker {
            BreakerState::Open => Self::Degraded,
            BreakerState::HalfOpen => Self::Recovering,
            BreakerState::Closed if security_violations > 10 => Self::SecurityAlert,
            BreakerState::Closed if active_loads >= max_concurrent_loads => Self::HighLoad,
            BreakerState::Closed => Self::Healthy,
        }
    }
}

/// Cache configuration and effectiveness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachingStats {
    /// Whether caching is enabled
    pub enabled: bool,
    /// Number of bundles currently cached
    pub cache_size: usize,
    /// Configured time-to-live in minutes
    pub cache_ttl_minutes: f64,
    /// Hits over all cache consultations so far
    pub hit_rate: f64,
}

/// Concurrency limits and current in-flight loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrencyStats {
    /// Configured permit count
    pub max_concurrent_loads: usize,
    /// Loads currently holding a permit
    pub active_loads: usize,
    /// Opaque tokens of the in-flight loads
    pub active_load_ids: Vec<String>,
}

/// Circuit breaker state as exposed to operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerStats {
    /// Current admission state
    pub state: BreakerState,
    /// Accumulated failure weight (partial loads count 0.5)
    pub failure_count: f64,
    /// Configured trip threshold
    pub threshold: u32,
}

/// Full statistics snapshot returned by
/// [`crate::ContextLoader::get_statistics`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatistics {
    /// Monotonic load counters
    pub load_statistics: LoadStatistics,
    /// Configured content root
    pub base_path: String,
    /// Per-file size cap in bytes
    pub max_file_size_bytes: u64,
    /// Recognised context file kinds
    pub supported_file_types: Vec<String>,
    /// Cache configuration and effectiveness
    pub caching: CachingStats,
    /// Concurrency limits and in-flight loads
    pub concurrency: ConcurrencyStats,
    /// Circuit breaker state
    pub circuit_breaker: BreakerStats,
    /// Derived health label
    pub service_status: HealthStatus,
}

/// Presence report for one expected context file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedFileReport {
    /// Expected file name
    pub file_name: String,
    /// Whether the file exists
    pub exists: bool,
    /// Resolved path that was checked
    pub file_path: String,
    /// File size in bytes, 0 when absent
    pub file_size: u64,
}

/// Result of the read-only directory probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryReport {
    /// Canonical character identifier
    pub character_id: String,
    /// Whether the character directory exists
    pub directory_exists: bool,
    /// Path of the probed directory
    pub directory_path: String,
    /// One entry per expected file kind, in bundle order
    pub expected_files: IndexMap<String, ExpectedFileReport>,
    /// How many expected files exist
    pub files_found: usize,
    /// Total number of expected files
    pub total_expected: usize,
    /// True iff at least one expected file exists
    pub validation_success: bool,
}
