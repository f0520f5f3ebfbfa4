//! The consolidated character bundle and its per-file metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::memory::MemoryContext;
use crate::model::objectives::ObjectivesContext;
use crate::model::profile::ProfileContext;
use crate::model::stats::StatsContext;

/// The four recognised context file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// `<id>_memory.md`
    Memory,
    /// `<id>_objectives.md`
    Objectives,
    /// `<id>_profile.md`
    Profile,
    /// `<id>_stats.yaml`
    Stats,
}

impl FileKind {
    /// All kinds in bundle order. Every bundle carries its file entries in
    /// exactly this order.
    pub const ALL: [FileKind; 4] = [
        FileKind::Memory,
        FileKind::Objectives,
        FileKind::Profile,
        FileKind::Stats,
    ];

    /// File-name suffix for this kind.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Memory => "_memory.md",
            Self::Objectives => "_objectives.md",
            Self::Profile => "_profile.md",
            Self::Stats => "_stats.yaml",
        }
    }

    /// Stable lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Objectives => "objectives",
            Self::Profile => "profile",
            Self::Stats => "stats",
        }
    }

    /// Expected file name for a canonical identifier.
    pub fn file_name(self, character_id: &str) -> String {
        format!("{character_id}{}", self.suffix())
    }
}

/// Metadata about one attempted context file.
///
/// A bundle always carries one of these per expected kind; a missing file
/// is represented explicitly rather than omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedFileInfo {
    /// Logical file name
    pub file_name: String,
    /// Resolved path of the attempted read
    pub file_path: String,
    /// Whether the file was read and parsed successfully
    pub loaded_successfully: bool,
    /// File size in bytes, 0 if never read
    pub file_size_bytes: u64,
    /// When the read was attempted
    pub load_timestamp: DateTime<Utc>,
    /// Error message if loading failed
    pub error_message: Option<String>,
}

impl LoadedFileInfo {
    /// Record a successful read-and-parse.
    pub fn success(file_name: impl Into<String>, file_path: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            file_path: file_path.into(),
            loaded_successfully: true,
            file_size_bytes: size,
            load_timestamp: Utc::now(),
            error_message: None,
        }
    }

    /// Record a failed attempt.
    pub fn failure(
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        size: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_path: file_path.into(),
            loaded_successfully: false,
            file_size_bytes: size,
            load_timestamp: Utc::now(),
            error_message: Some(error.into()),
        }
    }
}

/// Consolidated per-character context bundle: the output of one load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterContext {
    /// Canonical character identifier
    pub character_id: String,
    /// Display name, resolved profile -> stats -> identifier
    pub character_name: String,

    /// Memory sub-context, if its file parsed
    pub memory_context: Option<MemoryContext>,
    /// Objectives sub-context, if its file parsed
    pub objectives_context: Option<ObjectivesContext>,
    /// Profile sub-context, if its file parsed
    pub profile_context: Option<ProfileContext>,
    /// Stats sub-context, if its file parsed
    pub stats_context: Option<StatsContext>,

    /// Exactly four entries, in (memory, objectives, profile, stats) order
    pub loaded_files: Vec<LoadedFileInfo>,
    /// When this bundle was assembled
    pub load_timestamp: DateTime<Utc>,
    /// True iff at least one sub-context parsed
    pub load_success: bool,
    /// True iff some but not all sub-contexts parsed
    pub partial_load: bool,

    /// False when cross-context inconsistencies were found
    pub context_integrity: bool,
    /// Non-critical validation warnings
    pub validation_warnings: Vec<String>,
}

impl CharacterContext {
    /// Assemble a bundle from the four per-kind parser outcomes.
    ///
    /// File entries are emitted in the fixed bundle order regardless of the
    /// order the reads completed in.
    pub fn from_parts(
        character_id: impl Into<String>,
        memory: (Option<MemoryContext>, LoadedFileInfo),
        objectives: (Option<ObjectivesContext>, LoadedFileInfo),
        profile: (Option<ProfileContext>, LoadedFileInfo),
        stats: (Option<StatsContext>, LoadedFileInfo),
    ) -> Self {
        let character_id = character_id.into();
        let (memory_context, memory_info) = memory;
        let (objectives_context, objectives_info) = objectives;
        let (profile_context, profile_info) = profile;
        let (stats_context, stats_info) = stats;

        let character_name = profile_context
            .as_ref()
            .map(|p| p.name.clone())
            .or_else(|| stats_context.as_ref().map(|s| s.name.clone()))
            .unwrap_or_else(|| character_id.clone());

        let loaded = [
            memory_context.is_some(),
            objectives_context.is_some(),
            profile_context.is_some(),
            stats_context.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        let load_success = loaded > 0;
        let partial_load = load_success && loaded < FileKind::ALL.len();

        let mut validation_warnings = Vec::new();
        if !load_success {
            validation_warnings.push("no context data was successfully loaded".to_string());
        }

        Self {
            character_id,
            character_name,
            memory_context,
            objectives_context,
            profile_context,
            stats_context,
            loaded_files: vec![memory_info, objectives_info, profile_info, stats_info],
            load_timestamp: Utc::now(),
            load_success,
            partial_load,
            context_integrity: true,
            validation_warnings,
        }
    }

    /// Number of sub-contexts that parsed.
    pub fn loaded_context_count(&self) -> usize {
        [
            self.memory_context.is_some(),
            self.objectives_context.is_some(),
            self.profile_context.is_some(),
            self.stats_context.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Primary display name for the character.
    pub fn primary_name(&self) -> &str {
        if !self.character_name.is_empty() {
            &self.character_name
        } else {
            &self.character_id
        }
    }

    /// Serialisable digest of what this bundle contains.
    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            character_id: self.character_id.clone(),
            character_name: self.primary_name().to_string(),
            memory_loaded: self.memory_context.is_some(),
            objectives_loaded: self.objectives_context.is_some(),
            profile_loaded: self.profile_context.is_some(),
            stats_loaded: self.stats_context.is_some(),
            successful_files: self
                .loaded_files
                .iter()
                .filter(|f| f.loaded_successfully)
                .count(),
            load_success: self.load_success,
            partial_load: self.partial_load,
            context_integrity: self.context_integrity,
            warning_count: self.validation_warnings.len(),
        }
    }
}

/// Digest of a bundle for logs and CLI output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSummary {
    /// Canonical character identifier
    pub character_id: String,
    /// Resolved display name
    pub character_name: String,
    /// Whether the memory sub-context parsed
    pub memory_loaded: bool,
    /// Whether the objectives sub-context parsed
    pub objectives_loaded: bool,
    /// Whether the profile sub-context parsed
    pub profile_loaded: bool,
    /// Whether the stats sub-context parsed
    pub stats_loaded: bool,
    /// How many of the four files read and parsed
    pub successful_files: usize,
    /// Bundle-level success flag
    pub load_success: bool,
    /// Bundle-level partial flag
    pub partial_load: bool,
    /// Bundle-level integrity flag
    pub context_integrity: bool,
    /// Number of validation warnings
    pub warning_count: usize,
}
