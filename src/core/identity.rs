//! Identifier sanitisation and content-root containment.
//!
//! Every load starts with a user-supplied character identifier. It is first
//! normalised into a canonical filesystem-safe form (`[a-z0-9_-]{1,100}`),
//! then resolved under the configured content root with traversal and
//! containment checks before any file is touched.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::errors::{ContextError, Result};

/// Maximum length of a canonical identifier.
pub const MAX_IDENTIFIER_LEN: usize = 100;

static STRIP_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-\s]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static CANONICAL_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").unwrap());

/// Normalise a raw character identifier into canonical form.
///
/// Trims outer whitespace, strips everything outside the ASCII word class
/// (plus hyphens and whitespace), collapses whitespace runs to single
/// underscores, and lowercases. `"Aria Shadowbane"` becomes
/// `"aria_shadowbane"`.
pub fn sanitize_identifier(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ContextError::invalid_identifier(
            "identifier must be a non-empty string",
        ));
    }

    let stripped = STRIP_UNSAFE.replace_all(trimmed, "");
    if stripped.is_empty() {
        return Err(ContextError::invalid_identifier(format!(
            "identifier contains no valid characters: {raw}"
        )));
    }

    let canonical = WHITESPACE_RUN
        .replace_all(&stripped.to_lowercase(), "_")
        .into_owned();

    if canonical.len() > MAX_IDENTIFIER_LEN {
        return Err(ContextError::invalid_identifier(format!(
            "identifier too long (max {MAX_IDENTIFIER_LEN} chars): {raw}"
        )));
    }

    debug!(raw, canonical = %canonical, "sanitized character identifier");
    Ok(canonical)
}

/// Resolve the character directory for `character_id` under `content_root`,
/// enforcing containment.
///
/// The raw identifier is checked alongside the canonical one so traversal
/// attempts are reported as security violations even though sanitisation
/// strips the offending characters. Resolution follows symlinks; a resolved
/// directory outside the content root is a violation regardless of how it
/// was reached.
pub fn resolve_character_dir(
    content_root: &Path,
    raw: &str,
    character_id: &str,
) -> Result<PathBuf> {
    if raw.contains("..") || raw.contains('/') || raw.contains('\\') {
        return Err(ContextError::security(format!(
            "path traversal detected in character identifier: {raw}"
        )));
    }

    if character_id.len() > MAX_IDENTIFIER_LEN {
        return Err(ContextError::security(format!(
            "character identifier too long: {} chars",
            character_id.len()
        )));
    }

    // Defence in depth: unreachable for identifiers produced by
    // sanitize_identifier.
    if !CANONICAL_FORM.is_match(character_id) {
        return Err(ContextError::security(format!(
            "invalid characters in character identifier: {character_id}"
        )));
    }

    let root = content_root.canonicalize().map_err(|_| {
        ContextError::directory_not_found(character_id)
    })?;

    let resolved = root
        .join(character_id)
        .canonicalize()
        .map_err(|_| ContextError::directory_not_found(character_id))?;

    if !resolved.starts_with(&root) {
        return Err(ContextError::security(
            "path resolution outside content root detected",
        ));
    }

    if !resolved.is_dir() {
        return Err(ContextError::directory_not_found(character_id));
    }

    debug!(path = %resolved.display(), "resolved character directory");
    Ok(resolved)
}
