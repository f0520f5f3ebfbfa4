//! Parser for the profile markdown file.
//!
//! Extracts bold identity fields, the physical description and background
//! sections, and emotional drives from bold headings that mention drives
//! or emotions. Identity fields outside their documented bounds fail the
//! profile sub-context.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::{ContextError, Result};
use crate::model::profile::{DominanceLevel, EmotionalDrive, ProfileContext};

static NAME_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\*\*Name\*\*:\s*([^\n]+)").unwrap());
static AGE_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\*\*Age\*\*:\s*(\d+)").unwrap());
static GENDER_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Gender\*\*:\s*([^\n]+)").unwrap());
static RACE_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\*\*Race\*\*:\s*([^\n]+)").unwrap());
static CLASS_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Class\*\*:\s*([^\n]+)").unwrap());

static PHYSICAL_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)physical description").unwrap());
static BACKGROUND_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)background").unwrap());
static BOLD_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

/// Longest accepted drive description.
const MAX_DRIVE_LEN: usize = 200;

fn err(message: impl Into<String>) -> ContextError {
    ContextError::parse("profile", message)
}

/// Parse a profile document into a [`ProfileContext`].
pub fn parse_profile(content: &str) -> Result<ProfileContext> {
    let name = field(content, &NAME_FIELD).unwrap_or_else(|| "Unknown".to_string());
    if name.len() > 100 {
        return Err(err("name too long (max 100 chars)"));
    }

    let age = match AGE_FIELD.captures(content) {
        Some(captures) => captures[1]
            .parse::<u32>()
            .map_err(|_| err("age is not a valid integer"))?,
        None => 0,
    };
    if age > 200 {
        return Err(err(format!("age must be between 0-200, got {age}")));
    }

    let gender = field(content, &GENDER_FIELD).unwrap_or_else(|| "Unknown".to_string());
    if gender.len() > 20 {
        return Err(err("gender too long (max 20 chars)"));
    }

    let race = field(content, &RACE_FIELD).unwrap_or_else(|| "Unknown".to_string());
    if race.len() > 50 {
        return Err(err("race too long (max 50 chars)"));
    }

    let character_class = field(content, &CLASS_FIELD).unwrap_or_else(|| "Unknown".to_string());
    if character_class.len() > 50 {
        return Err(err("class too long (max 50 chars)"));
    }

    Ok(ProfileContext {
        name,
        age,
        gender,
        race,
        character_class,
        title: None,
        affiliation: None,
        physical_description: section(content, &PHYSICAL_HEADING)
            .unwrap_or_else(|| "Not provided".to_string()),
        distinguishing_features: Vec::new(),
        background_summary: section(content, &BACKGROUND_HEADING)
            .unwrap_or_else(|| "Not provided".to_string()),
        key_life_phases: Vec::new(),
        emotional_drives: emotional_drives(content),
        emotional_responses: Vec::new(),
        personality_traits: Vec::new(),
        core_skills: Vec::new(),
        specializations: Vec::new(),
        equipment: Vec::new(),
        resources: Vec::new(),
    })
}

fn field(content: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(content)
        .map(|captures| captures[1].trim().to_string())
}

/// Free text following a section heading, up to the next `#`.
fn section(content: &str, heading: &Regex) -> Option<String> {
    let found = heading.find(content)?;
    let rest = &content[found.end()..];
    let end = rest.find('#').unwrap_or(rest.len());
    let text = rest[..end].trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Bold headings mentioning "drive" or "emotional" become emotional drives,
/// with up to 200 characters of the following text as their foundation.
fn emotional_drives(content: &str) -> Vec<EmotionalDrive> {
    let spans: Vec<_> = BOLD_SPAN.captures_iter(content).collect();
    let mut drives = Vec::new();

    for (index, captures) in spans.iter().enumerate() {
        let heading = captures[1].trim().to_string();
        let lowered = heading.to_lowercase();
        if !lowered.contains("drive") && !lowered.contains("emotional") {
            continue;
        }

        let tail_start = captures.get(0).map(|m| m.end()).unwrap_or(content.len());
        let tail_end = spans
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(content.len());
        let foundation: String = content[tail_start..tail_end]
            .trim()
            .chars()
            .take(MAX_DRIVE_LEN)
            .collect();

        drives.push(EmotionalDrive {
            name: heading,
            dominance_level: DominanceLevel::Core,
            foundation,
            positive_expression: "Positive manifestation documented".to_string(),
            negative_expression: "Negative manifestation documented".to_string(),
            trigger_events: Vec::new(),
            soothing_behaviors: Vec::new(),
        });
    }

    drives
}
