//! Profile sub-context: identity, appearance, background, and the
//! emotional model.

use serde::{Deserialize, Serialize};

/// How strongly an emotional drive governs the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominanceLevel {
    /// Overrides other drives under stress
    Dominant,
    /// A stable part of the personality
    Core,
    /// Newly forming
    Emerging,
}

/// Core emotional drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalDrive {
    /// Drive name
    pub name: String,
    /// How strongly the drive governs behaviour
    pub dominance_level: DominanceLevel,
    /// Psychological foundation
    pub foundation: String,
    /// How it manifests positively
    pub positive_expression: String,
    /// How it manifests negatively
    pub negative_expression: String,
    /// Events that trigger this drive
    pub trigger_events: Vec<String>,
    /// Behaviours that soothe this drive
    pub soothing_behaviors: Vec<String>,
}

/// Emotional response pattern for one escalation level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalResponse {
    /// Escalation level, 1 (low) to 3 (high)
    pub level: u8,
    /// Human-readable level name
    pub level_name: String,
    /// Physiological response
    pub physiological: String,
    /// Emotional state
    pub emotional: String,
    /// Cognitive patterns
    pub cognitive: String,
    /// Behavioural response
    pub behavioral: String,
    /// Social interaction changes
    pub social: String,
    /// Time required for recovery
    pub recovery_time: String,
}

/// Personality trait with emotional context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTrait {
    /// Trait name (up to 50 chars)
    pub name: String,
    /// Trait strength, 0.0 to 1.0
    pub score: f64,
    /// Emotional basis for this trait
    pub emotional_foundation: String,
    /// Positive manifestation
    pub positive_expression: String,
    /// Negative manifestation
    pub negative_expression: String,
    /// What triggers this trait
    pub emotional_triggers: Vec<String>,
}

/// Complete character profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileContext {
    /// Character name (up to 100 chars)
    pub name: String,
    /// Character age (0 to 200)
    pub age: u32,
    /// Character gender (up to 20 chars)
    pub gender: String,
    /// Character race (up to 50 chars)
    pub race: String,
    /// Character class (up to 50 chars)
    pub character_class: String,
    /// Character title, if any
    pub title: Option<String>,
    /// Primary affiliation, if any
    pub affiliation: Option<String>,

    /// Physical appearance description
    pub physical_description: String,
    /// Notable physical features
    pub distinguishing_features: Vec<String>,

    /// Background summary
    pub background_summary: String,
    /// Major life phases
    pub key_life_phases: Vec<String>,

    /// Core emotional drives
    pub emotional_drives: Vec<EmotionalDrive>,
    /// Response patterns per escalation level
    pub emotional_responses: Vec<EmotionalResponse>,
    /// Personality traits
    pub personality_traits: Vec<PersonalityTrait>,

    /// Primary skills
    pub core_skills: Vec<String>,
    /// Areas of specialization
    pub specializations: Vec<String>,
    /// Notable equipment
    pub equipment: Vec<String>,
    /// Available resources
    pub resources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominance_level_serializes_verbatim() {
        assert_eq!(serde_json::to_string(&DominanceLevel::Core).unwrap(), "\"Core\"");
        assert_eq!(
            serde_json::to_string(&DominanceLevel::Dominant).unwrap(),
            "\"Dominant\""
        );
    }
}
