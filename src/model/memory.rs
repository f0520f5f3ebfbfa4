//! Memory sub-context: formative events, relationship memories, and
//! behavioural triggers.

use serde::{Deserialize, Serialize};

/// Derived trust bracket for a relationship score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustCategory {
    /// Score 70 and above
    High,
    /// Score 40 to 69
    Medium,
    /// Score below 40
    Low,
}

/// Trust measurement for a relationship.
///
/// The category is always derived from the score; construct through
/// [`TrustLevel::new`] rather than by literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLevel {
    /// Trust score from 0 to 100
    pub score: u8,
    /// Derived trust bracket
    pub category: TrustCategory,
}

impl TrustLevel {
    /// Build a trust level, deriving the category from the score.
    pub fn new(score: u8) -> Self {
        let category = if score >= 70 {
            TrustCategory::High
        } else if score >= 40 {
            TrustCategory::Medium
        } else {
            TrustCategory::Low
        };
        Self { score, category }
    }
}

/// Classification of character memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// A core traumatic experience
    TraumaticCore,
    /// Learning that shaped later behaviour
    FoundationalLearning,
    /// An identity-defining moment
    IdentityFormation,
    /// A betrayal or broken trust
    TrustViolation,
    /// A milestone achievement
    AchievementMilestone,
    /// An encounter that changed the character
    TransformationalEncounter,
    /// A shift in long-term strategy
    StrategicEvolution,
    /// A change in worldview
    PerspectiveShift,
}

/// Classification of character relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Mentor and partner
    MentorPartner,
    /// Strategic alliance
    StrategicPartner,
    /// Professional rival
    ProfessionalRival,
    /// Business contact
    BusinessContact,
    /// Close professional bond
    ProfessionalBrotherhood,
    /// General professional network
    ProfessionalNetwork,
}

/// A formative event in character development.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormativeEvent {
    /// Age when the event occurred (0 to 200)
    pub age: u32,
    /// Short event name (up to 200 chars)
    pub event_name: String,
    /// Free-text event description
    pub description: String,
    /// Classification of the memory
    pub memory_type: MemoryType,
    /// Emotional impact description
    pub emotional_impact: String,
    /// How this event influences decisions
    pub decision_influence: String,
    /// Phrases that trigger this memory
    pub trigger_phrases: Vec<String>,
    /// Primary lesson learned, if any
    pub key_lesson: Option<String>,
}

/// Memory of a specific relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMemory {
    /// Name of the related character (up to 100 chars)
    pub character_name: String,
    /// Classification of the relationship
    pub relationship_type: RelationshipType,
    /// How the relationship was established
    pub memory_foundation: String,
    /// Trust measurement
    pub trust_level: TrustLevel,
    /// Emotional relationship patterns
    pub emotional_dynamics: String,
    /// Key shared experiences
    pub shared_experiences: Vec<String>,
    /// Sources of conflict
    pub conflict_points: Vec<String>,
    /// Strength assessment if allied
    pub alliance_strength: Option<String>,
}

/// Behavioural pattern rooted in a memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralTrigger {
    /// Trigger name
    pub trigger_name: String,
    /// Which memory created this trigger
    pub memory_origin: String,
    /// Conditions that activate it
    pub trigger_conditions: Vec<String>,
    /// How the character responds
    pub behavioral_response: String,
    /// What can override the response
    pub override_conditions: Vec<String>,
}

/// Complete memory system for a character.
///
/// Formative events are kept sorted by age.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryContext {
    /// Major formative experiences, non-decreasing in age
    pub formative_events: Vec<FormativeEvent>,
    /// Key relationship memories
    pub relationships: Vec<RelationshipMemory>,
    /// Memory-driven behaviours
    pub behavioral_triggers: Vec<BehavioralTrigger>,
}
