//! Parser for the memory markdown file.
//!
//! Extracts formative events from age-marked lines and relationship
//! memories from bold-emphasised names with trust annotations. Matches
//! that fail element-level conversion are skipped silently; the document
//! as a whole still yields a memory sub-context.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::Result;
use crate::model::memory::{
    FormativeEvent, MemoryContext, MemoryType, RelationshipMemory, RelationshipType, TrustLevel,
};

static RELATIONSHIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\*\*([^*]+)\*\*[^*]*trust.*?(\d+).*?relationship.*?[:\-]?\s*([^*\n]+)")
        .unwrap()
});

static AGE_EVENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bage\s*(\d+)[^\S\n]*[:\-]?\s*([^.\n]+\.)").unwrap());

/// Oldest age accepted for a formative event.
const MAX_EVENT_AGE: u32 = 120;

/// Shortest description accepted for a formative event.
const MIN_DESCRIPTION_LEN: usize = 10;

/// Parse a memory document into a [`MemoryContext`].
pub fn parse_memory(content: &str) -> Result<MemoryContext> {
    let mut formative_events = Vec::new();
    for captures in AGE_EVENT.captures_iter(content) {
        let Ok(age) = captures[1].parse::<u32>() else {
            continue;
        };
        let description = captures[2].trim().to_string();

        if age > MAX_EVENT_AGE || description.len() <= MIN_DESCRIPTION_LEN {
            continue;
        }

        formative_events.push(FormativeEvent {
            age,
            event_name: format!("Event at age {age}"),
            description,
            memory_type: MemoryType::FoundationalLearning,
            emotional_impact: "Documented in memory context".to_string(),
            decision_influence: "Influences current behavior patterns".to_string(),
            trigger_phrases: Vec::new(),
            key_lesson: None,
        });
    }
    // Document order is authoring order; bundles promise non-decreasing ages.
    formative_events.sort_by_key(|event| event.age);

    let mut relationships = Vec::new();
    for captures in RELATIONSHIP.captures_iter(content) {
        let character_name = captures[1].trim().to_string();
        let Ok(score) = captures[2].parse::<u8>() else {
            continue;
        };
        if score > 100 || character_name.len() > 100 {
            continue;
        }

        relationships.push(RelationshipMemory {
            character_name,
            relationship_type: RelationshipType::ProfessionalNetwork,
            memory_foundation: "Documented in memory context".to_string(),
            trust_level: TrustLevel::new(score),
            emotional_dynamics: captures[3].trim().to_string(),
            shared_experiences: Vec::new(),
            conflict_points: Vec::new(),
            alliance_strength: None,
        });
    }

    Ok(MemoryContext {
        formative_events,
        relationships,
        behavioral_triggers: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::memory::TrustCategory;

    const MEMORY_DOC: &str = "\
# Memory Archive

## Formative Events

At age 14 - watched the harbour district burn to the waterline.
At age 9 - first taught to read maps by the caravan master.
At age 300 - impossible event that should be ignored entirely.
Age 30: short.

## Relationships

**Kael Voss** remains close, trust holding at 85, relationship: sworn ally since the siege.
**Dorian Ashe** is circled carefully, trust down to 20, relationship - rival broker.
";

    #[test]
    fn test_extracts_and_sorts_formative_events() {
        let memory = parse_memory(MEMORY_DOC).unwrap();

        let ages: Vec<u32> = memory.formative_events.iter().map(|e| e.age).collect();
        assert_eq!(ages, vec![9, 14]);
        assert_eq!(memory.formative_events[0].event_name, "Event at age 9");
        assert_eq!(
            memory.formative_events[0].memory_type,
            MemoryType::FoundationalLearning
        );
    }

    #[test]
    fn test_age_boundary() {
        let at_limit = "Age 120 - settled the last of the old debts in person.";
        let past_limit = "Age 121 - settled the last of the old debts in person.";

        assert_eq!(parse_memory(at_limit).unwrap().formative_events.len(), 1);
        assert_eq!(parse_memory(past_limit).unwrap().formative_events.len(), 0);
    }

    #[test]
    fn test_extracts_relationships_with_derived_trust() {
        let memory = parse_memory(MEMORY_DOC).unwrap();
        assert_eq!(memory.relationships.len(), 2);

        let kael = &memory.relationships[0];
        assert_eq!(kael.character_name, "Kael Voss");
        assert_eq!(kael.trust_level.score, 85);
        assert_eq!(kael.trust_level.category, TrustCategory::High);
        assert_eq!(kael.relationship_type, RelationshipType::ProfessionalNetwork);

        let dorian = &memory.relationships[1];
        assert_eq!(dorian.trust_level.score, 20);
        assert_eq!(dorian.trust_level.category, TrustCategory::Low);
    }

    #[test]
    fn test_unparseable_matches_are_skipped_silently() {
        let doc = "**Ghost** spoken of with trust near 999, relationship: unknown courier.";
        let memory = parse_memory(doc).unwrap();
        assert!(memory.relationships.is_empty());
    }

    #[test]
    fn test_plain_document_yields_empty_context() {
        let memory = parse_memory("Nothing structured lives here.").unwrap();
        assert!(memory.formative_events.is_empty());
        assert!(memory.relationships.is_empty());
        assert!(memory.behavioral_triggers.is_empty());
    }
}
