//! Objectives sub-context: the three-tier objective hierarchy and its
//! resource allocation block.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::errors::{ContextError, Result};

/// Objective hierarchy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveTier {
    /// Lifelong defining objectives
    CoreLife,
    /// Multi-arc strategic objectives
    Strategic,
    /// Near-term tactical objectives
    Tactical,
}

/// Status of an objective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    /// Currently pursued
    #[default]
    Active,
    /// Not yet started
    Pending,
    /// Achieved
    Completed,
    /// On hold
    Paused,
    /// Given up
    Abandoned,
}

/// Individual objective with full metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Objective name (up to 200 chars)
    pub name: String,
    /// Detailed description
    pub description: String,
    /// Hierarchy tier
    pub tier: ObjectiveTier,
    /// Current status
    pub status: ObjectiveStatus,
    /// Priority level, 1 (lowest) to 10
    pub priority: u8,
    /// How success is measured
    pub success_metrics: Vec<String>,
    /// Expected timeline, if stated
    pub timeline: Option<String>,
    /// Dependencies on other objectives
    pub dependencies: Vec<String>,
    /// What motivates this objective
    pub motivation_source: Option<String>,
    /// Potential risk factors
    pub risk_factors: Vec<String>,
}

/// Resource allocation across objectives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    /// Time and energy split; when non-empty the values must sum to 100
    pub time_energy_percentages: IndexMap<String, u32>,
    /// Success measurement thresholds
    pub success_thresholds: IndexMap<String, f64>,
}

impl ResourceAllocation {
    /// Check the percentage-sum invariant.
    pub fn validate(&self) -> Result<()> {
        if self.time_energy_percentages.is_empty() {
            return Ok(());
        }

        let total: u32 = self.time_energy_percentages.values().sum();
        if total != 100 {
            return Err(ContextError::parse(
                "objectives",
                format!("time/energy percentages must sum to 100, got {total}"),
            ));
        }
        Ok(())
    }
}

/// Complete objectives framework for a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectivesContext {
    /// Core life objectives
    pub core_objectives: Vec<Objective>,
    /// Strategic objectives
    pub strategic_objectives: Vec<Objective>,
    /// Tactical objectives
    pub tactical_objectives: Vec<Objective>,
    /// Resource management block
    pub resource_allocation: ResourceAllocation,
    /// Current primary focus area, if stated
    pub current_focus: Option<String>,
}

impl ObjectivesContext {
    /// Total number of objectives across all tiers.
    pub fn objective_count(&self) -> usize {
        self.core_objectives.len() + self.strategic_objectives.len() + self.tactical_objectives.len()
    }
}
