//! Stats sub-context: identity, bounded stat maps, equipment, and
//! relationship tables parsed from the structured stats file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::errors::{ContextError, Result};

/// Combat statistics, each bounded to 0..=10.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Primary combat statistics by name
    pub primary_stats: IndexMap<String, i64>,
}

impl CombatStats {
    /// Check the 0..=10 bound on every stat.
    pub fn validate(&self) -> Result<()> {
        validate_stat_map("stats", &self.primary_stats)
    }
}

/// Psychological trait scores, each bounded to 0..=10.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PsychologicalProfile {
    /// Trait scores by name
    pub traits: IndexMap<String, i64>,
}

impl PsychologicalProfile {
    /// Check the 0..=10 bound on every trait.
    pub fn validate(&self) -> Result<()> {
        validate_stat_map("stats", &self.traits)
    }
}

fn validate_stat_map(kind: &str, map: &IndexMap<String, i64>) -> Result<()> {
    for (name, value) in map {
        if !(0..=10).contains(value) {
            return Err(ContextError::parse(
                kind,
                format!("{name} must be between 0-10, got {value}"),
            ));
        }
    }
    Ok(())
}

/// One entry in a relationship list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEntry {
    /// Related character name
    pub name: String,
    /// Trust level, 0 to 100
    pub trust_level: u8,
    /// Free-form relationship type
    pub relationship_type: String,
}

/// Character statistics parsed from the structured stats file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsContext {
    /// Character name
    pub name: String,
    /// Character age (0 to 200)
    pub age: u32,
    /// Character origin
    pub origin: String,
    /// Character faction
    pub faction: String,
    /// Character rank, if any
    pub rank: Option<String>,
    /// Primary specialization
    pub specialization: String,

    /// Combat statistics
    pub combat_stats: CombatStats,
    /// Psychological traits
    pub psychological_profile: PsychologicalProfile,

    /// Equipment data, preserved as authored
    pub equipment: IndexMap<String, serde_yaml::Value>,
    /// Relationships keyed by relation kind
    pub relationships: IndexMap<String, Vec<RelationshipEntry>>,
    /// Location data, preserved as authored
    pub locations: IndexMap<String, serde_yaml::Value>,
    /// Primary objectives
    pub objectives: IndexMap<String, String>,

    /// Unrecognised top-level keys, preserved losslessly in authoring order
    pub additional_data: IndexMap<String, serde_yaml::Value>,
}
