//! Parser for the objectives markdown file.
//!
//! Locates the three tier sections (core life, strategic, tactical) by
//! heading keyword and turns every bold-emphasised name inside a section
//! into an objective, with the trailing text as its description.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::{ContextError, Result};
use crate::model::objectives::{
    Objective, ObjectiveStatus, ObjectiveTier, ObjectivesContext,
};

static CORE_LIFE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)core life").unwrap());
static STRATEGIC_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)strategic").unwrap());
static TACTICAL_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)tactical").unwrap());
static BOLD_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

/// Longest accepted objective name.
const MAX_NAME_LEN: usize = 200;

/// Descriptions are truncated to this many characters.
const MAX_DESCRIPTION_LEN: usize = 500;

/// Parse an objectives document into an [`ObjectivesContext`].
pub fn parse_objectives(content: &str) -> Result<ObjectivesContext> {
    Ok(ObjectivesContext {
        core_objectives: tier_objectives(content, &CORE_LIFE_HEADING, ObjectiveTier::CoreLife)?,
        strategic_objectives: tier_objectives(
            content,
            &STRATEGIC_HEADING,
            ObjectiveTier::Strategic,
        )?,
        tactical_objectives: tier_objectives(content, &TACTICAL_HEADING, ObjectiveTier::Tactical)?,
        resource_allocation: Default::default(),
        current_focus: None,
    })
}

/// A tier's section runs from its heading keyword to the next `#`.
fn tier_section<'a>(content: &'a str, heading: &Regex) -> Option<&'a str> {
    let found = heading.find(content)?;
    let rest = &content[found.end()..];
    let end = rest.find('#').unwrap_or(rest.len());
    Some(&rest[..end])
}

fn tier_objectives(
    content: &str,
    heading: &Regex,
    tier: ObjectiveTier,
) -> Result<Vec<Objective>> {
    let Some(section) = tier_section(content, heading) else {
        return Ok(Vec::new());
    };

    let spans: Vec<_> = BOLD_SPAN.captures_iter(section).collect();
    let mut objectives = Vec::with_capacity(spans.len());

    for (index, captures) in spans.iter().enumerate() {
        let name = captures[1].trim().to_string();
        if name.is_empty() {
            continue;
        }
        if name.len() > MAX_NAME_LEN {
            return Err(ContextError::parse(
                "objectives",
                format!("objective name too long (max {MAX_NAME_LEN} chars)"),
            ));
        }

        let tail_start = captures.get(0).map(|m| m.end()).unwrap_or(section.len());
        let tail_end = spans
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(section.len());
        let description: String = section[tail_start..tail_end]
            .trim()
            .chars()
            .take(MAX_DESCRIPTION_LEN)
            .collect();

        objectives.push(Objective {
            name,
            description,
            tier,
            status: ObjectiveStatus::Active,
            priority: 5,
            success_metrics: Vec::new(),
            timeline: Some("Ongoing".to_string()),
            dependencies: Vec::new(),
            motivation_source: None,
            risk_factors: Vec::new(),
        });
    }

    Ok(objectives)
}
