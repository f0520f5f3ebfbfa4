//! Configuration for the context loader.
//!
//! A single flat [`LoaderConfig`] covers the content root, file-size cap,
//! caching, concurrency, the per-request deadline, and circuit-breaker
//! tuning. Configurations round-trip through YAML and are validated before
//! a loader is constructed.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{ContextError, Result};

/// Configuration for [`crate::ContextLoader`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory under which all character directories live
    pub content_root: PathBuf,

    /// Maximum allowed size of a single context file, in bytes
    pub max_file_size_bytes: u64,

    /// Whether loaded bundles are cached
    pub enable_caching: bool,

    /// Cache entry time-to-live, in minutes
    pub cache_ttl_minutes: f64,

    /// Maximum number of cached bundles before oldest-entry eviction
    pub cache_max_entries: usize,

    /// Maximum number of concurrently executing loads
    pub max_concurrent_loads: usize,

    /// Per-request deadline covering the four-way file fan-out, in seconds
    pub per_request_deadline_seconds: f64,

    /// Accumulated failures at which the circuit breaker opens
    pub circuit_breaker_threshold: u32,

    /// How long an open breaker waits before admitting a probe load, in minutes
    pub circuit_breaker_recovery_minutes: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("characters"),
            max_file_size_bytes: 10 * 1024 * 1024,
            enable_caching: true,
            cache_ttl_minutes: 30.0,
            cache_max_entries: 100,
            max_concurrent_loads: 5,
            per_request_deadline_seconds: 30.0,
            circuit_breaker_threshold: 10,
            circuit_breaker_recovery_minutes: 5.0,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ContextError::io(
                format!("failed to read config file: {}", path.display()),
                e,
            )
        })?;

        serde_yaml::from_str::<Self>(&content)
            .map_err(|e| ContextError::config(format!("invalid config file: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)
            .map_err(|e| ContextError::config(format!("cannot serialize config: {e}")))?;
        std::fs::write(&path, content).map_err(|e| {
            ContextError::io(
                format!("failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Cache time-to-live as a [`Duration`]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs_f64(self.cache_ttl_minutes * 60.0)
    }

    /// Per-request deadline as a [`Duration`]
    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs_f64(self.per_request_deadline_seconds)
    }

    /// Breaker recovery timeout as a [`Duration`]
    pub fn breaker_recovery(&self) -> Duration {
        Duration::from_secs_f64(self.circuit_breaker_recovery_minutes * 60.0)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size_bytes == 0 {
            return Err(ContextError::config_field(
                "max_file_size_bytes must be positive",
                "max_file_size_bytes",
            ));
        }

        if self.max_concurrent_loads == 0 {
            return Err(ContextError::config_field(
                "max_concurrent_loads must be at least 1",
                "max_concurrent_loads",
            ));
        }

        if self.circuit_breaker_threshold == 0 {
            return Err(ContextError::config_field(
                "circuit_breaker_threshold must be at least 1",
                "circuit_breaker_threshold",
            ));
        }

        if self.enable_caching && self.cache_max_entries == 0 {
            return Err(ContextError::config_field(
                "cache_max_entries must be at least 1 when caching is enabled",
                "cache_max_entries",
            ));
        }

        if self.cache_ttl_minutes <= 0.0 || !self.cache_ttl_minutes.is_finite() {
            return Err(ContextError::config_field(
                format!(
                    "cache_ttl_minutes must be a positive number, got {}",
                    self.cache_ttl_minutes
                ),
                "cache_ttl_minutes",
            ));
        }

        if self.per_request_deadline_seconds <= 0.0
            || !self.per_request_deadline_seconds.is_finite()
        {
            return Err(ContextError::config_field(
                format!(
                    "per_request_deadline_seconds must be a positive number, got {}",
                    self.per_request_deadline_seconds
                ),
                "per_request_deadline_seconds",
            ));
        }

        if self.circuit_breaker_recovery_minutes <= 0.0
            || !self.circuit_breaker_recovery_minutes.is_finite()
        {
            return Err(ContextError::config_field(
                format!(
                    "circuit_breaker_recovery_minutes must be a positive number, got {}",
                    self.circuit_breaker_recovery_minutes
                ),
                "circuit_breaker_recovery_minutes",
            ));
        }

        Ok(())
    }
}
