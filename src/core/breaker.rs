//! Three-state circuit breaker guarding load admission.
//!
//! Full load failures weigh one failure, partial loads weigh half. The
//! half-unit bookkeeping uses integers (one failure = two units) so the
//! observable "+0.5 per partial load" arithmetic is exact.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::errors::{ContextError, Result};

/// Admission state of the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    /// Normal operation, all loads admitted
    Closed,
    /// Shedding load, admissions rejected until the recovery timeout elapses
    Open,
    /// Probing: loads admitted, the next outcome decides the state
    HalfOpen,
}

impl BreakerState {
    /// Stable label used in statistics snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Failure-accumulating circuit breaker.
///
/// Not internally synchronised; the loader keeps it behind a mutex and
/// calls [`admit`](Self::admit) before any I/O and one of the `record_*`
/// methods after each load outcome.
#[derive(Debug)]
pub struct CircuitBreaker {
    state: BreakerState,
    /// Accumulated failure weight in half-units (full failure = 2)
    failure_units: u32,
    /// Trip point in half-units (2 x configured threshold)
    threshold_units: u32,
    recovery_timeout: Duration,
    last_failure: Option<Instant>,
}

impl CircuitBreaker {
    /// Create a closed breaker that opens once `threshold` failures
    /// accumulate and re-admits probes after `recovery_timeout`.
    pub fn new(threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            state: BreakerState::Closed,
            failure_units: 0,
            threshold_units: threshold.saturating_mul(2),
            recovery_timeout,
            last_failure: None,
        }
    }

    /// Decide whether a new load may proceed.
    ///
    /// While open, rejects with [`ContextError::ServiceUnavailable`] until
    /// the recovery timeout has elapsed, at which point the breaker moves to
    /// half-open and admits a probe.
    pub fn admit(&mut self) -> Result<()> {
        if self.state != BreakerState::Open {
            return Ok(());
        }

        let since_failure = self
            .last_failure
            .map(|at| at.elapsed())
            .unwrap_or(self.recovery_timeout);

        if since_failure >= self.recovery_timeout {
            self.state = BreakerState::HalfOpen;
            info!("circuit breaker moved to half-open state");
            return Ok(());
        }

        let remaining = self.recovery_timeout - since_failure;
        Err(ContextError::ServiceUnavailable {
            retry_after_secs: remaining.as_secs(),
        })
    }

    /// Record a fully successful load.
    pub fn record_success(&mut self) {
        if self.state == BreakerState::HalfOpen {
            self.state = BreakerState::Closed;
            self.failure_units = 0;
            info!("circuit breaker closed after successful recovery");
        }
    }

    /// Record a failed load (weight 1).
    pub fn record_failure(&mut self) {
        self.add_units(2);
    }

    /// Record a partial load (weight 0.5).
    pub fn record_partial_failure(&mut self) {
        self.add_units(1);
    }

    fn add_units(&mut self, units: u32) {
        self.failure_units = self.failure_units.saturating_add(units);
        self.last_failure = Some(Instant::now());

        if self.failure_units >= self.threshold_units && self.state != BreakerState::Open {
            self.state = BreakerState::Open;
            warn!(
                failures = self.failure_count(),
                "circuit breaker opened after repeated load failures"
            );
        }
    }

    /// Current admission state.
    pub fn state(&self) -> BreakerState {
        self.state
    }

    /// Accumulated failure weight in whole-failure units.
    pub fn failure_count(&self) -> f64 {
        f64::from(self.failure_units) / 2.0
    }
}
