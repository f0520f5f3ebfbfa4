//! Parser for the structured stats file.
//!
//! Consumes a YAML document and produces a [`StatsContext`]. Identity
//! fields default when absent; unknown top-level keys are preserved under
//! `additional_data`; out-of-range stat or trust values fail the stats
//! sub-context as a whole.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::core::errors::{ContextError, Result};
use crate::model::stats::{
    CombatStats, PsychologicalProfile, RelationshipEntry, StatsContext,
};

const KNOWN_KEYS: [&str; 7] = [
    "character",
    "combat_stats",
    "psychological_profile",
    "equipment",
    "relationships",
    "locations",
    "objectives",
];

fn err(message: impl Into<String>) -> ContextError {
    ContextError::parse("stats", message)
}

/// Parse a stats document into a [`StatsContext`].
pub fn parse_stats(content: &str) -> Result<StatsContext> {
    let doc: Value =
        serde_yaml::from_str(content).map_err(|e| err(format!("invalid YAML: {e}")))?;

    if doc.is_null() {
        return Err(err("file contains no data"));
    }

    let root = doc
        .as_mapping()
        .ok_or_else(|| err("top level must be a mapping"))?;
    if root.is_empty() {
        return Err(err("file contains no data"));
    }

    let character = match root.get("character") {
        Some(value) => value
            .as_mapping()
            .ok_or_else(|| err("'character' must be a mapping"))?
            .clone(),
        None => Mapping::new(),
    };

    let age = match character.get("age") {
        Some(value) => {
            let age = value
                .as_i64()
                .ok_or_else(|| err("character age must be an integer"))?;
            if !(0..=200).contains(&age) {
                return Err(err(format!("character age must be between 0-200, got {age}")));
            }
            age as u32
        }
        None => 0,
    };

    let combat_stats = CombatStats {
        primary_stats: integer_map(root.get("combat_stats"), "combat_stats")?,
    };
    combat_stats.validate()?;

    let psychological_profile = PsychologicalProfile {
        traits: integer_map(root.get("psychological_profile"), "psychological_profile")?,
    };
    psychological_profile.validate()?;

    let mut additional_data = IndexMap::new();
    for (key, value) in root {
        let key = key
            .as_str()
            .ok_or_else(|| err("top-level keys must be strings"))?;
        if !KNOWN_KEYS.contains(&key) {
            additional_data.insert(key.to_string(), value.clone());
        }
    }

    Ok(StatsContext {
        name: string_field(&character, "name")?.unwrap_or_else(|| "Unknown".to_string()),
        age,
        origin: string_field(&character, "origin")?.unwrap_or_else(|| "Unknown".to_string()),
        faction: string_field(&character, "faction")?
            .unwrap_or_else(|| "Independent".to_string()),
        rank: string_field(&character, "rank")?,
        specialization: string_field(&character, "specialization")?
            .unwrap_or_else(|| "General".to_string()),
        combat_stats,
        psychological_profile,
        equipment: value_map(root.get("equipment"), "equipment")?,
        relationships: relationship_map(root.get("relationships"))?,
        locations: value_map(root.get("locations"), "locations")?,
        objectives: string_map(root.get("objectives"), "objectives")?,
        additional_data,
    })
}

fn string_field(map: &Mapping, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(err(format!("character {key} must be a string"))),
    }
}

fn integer_map(value: Option<&Value>, key: &str) -> Result<IndexMap<String, i64>> {
    let Some(value) = value else {
        return Ok(IndexMap::new());
    };
    let mapping = value
        .as_mapping()
        .ok_or_else(|| err(format!("'{key}' must be a mapping")))?;

    let mut out = IndexMap::with_capacity(mapping.len());
    for (name, value) in mapping {
        let name = name
            .as_str()
            .ok_or_else(|| err(format!("'{key}' keys must be strings")))?;
        let value = value
            .as_i64()
            .ok_or_else(|| err(format!("'{key}.{name}' must be an integer")))?;
        out.insert(name.to_string(), value);
    }
    Ok(out)
}

fn value_map(value: Option<&Value>, key: &str) -> Result<IndexMap<String, Value>> {
    let Some(value) = value else {
        return Ok(IndexMap::new());
    };
    let mapping = value
        .as_mapping()
        .ok_or_else(|| err(format!("'{key}' must be a mapping")))?;

    let mut out = IndexMap::with_capacity(mapping.len());
    for (name, value) in mapping {
        let name = name
            .as_str()
            .ok_or_else(|| err(format!("'{key}' keys must be strings")))?;
        out.insert(name.to_string(), value.clone());
    }
    Ok(out)
}

fn string_map(value: Option<&Value>, key: &str) -> Result<IndexMap<String, String>> {
    let mut out = IndexMap::new();
    for (name, value) in value_map(value, key)? {
        let value = value
            .as_str()
            .ok_or_else(|| err(format!("'{key}.{name}' must be a string")))?
            .to_string();
        out.insert(name, value);
    }
    Ok(out)
}

/// Relationship lists accept two element shapes: full mappings and bare
/// strings. Bare strings inherit the containing relation kind as their
/// relationship type. Non-list relation kinds are ignored.
fn relationship_map(
    value: Option<&Value>,
) -> Result<IndexMap<String, Vec<RelationshipEntry>>> {
    let Some(value) = value else {
        return Ok(IndexMap::new());
    };
    let mapping = value
        .as_mapping()
        .ok_or_else(|| err("'relationships' must be a mapping"))?;

    let mut out = IndexMap::new();
    for (kind, list) in mapping {
        let kind = kind
            .as_str()
            .ok_or_else(|| err("'relationships' keys must be strings"))?;
        let Some(items) = list.as_sequence() else {
            continue;
        };

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Mapping(entry) => {
                    let name = entry
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    let trust = match entry.get("trust_level") {
                        Some(value) => value.as_i64().ok_or_else(|| {
                            err(format!("relationship trust_level for '{name}' must be an integer"))
                        })?,
                        None => 50,
                    };
                    if !(0..=100).contains(&trust) {
                        return Err(err(format!(
                            "relationship trust_level must be between 0-100, got {trust}"
                        )));
                    }
                    let relationship_type = entry
                        .get("relationship_type")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string();

                    entries.push(RelationshipEntry {
                        name,
                        trust_level: trust as u8,
                        relationship_type,
                    });
                }
                Value::String(name) => entries.push(RelationshipEntry {
                    name: name.clone(),
                    trust_level: 50,
                    relationship_type: kind.to_string(),
                }),
                _ => {}
            }
        }
        out.insert(kind.to_string(), entries);
    }
    Ok(out)
}
