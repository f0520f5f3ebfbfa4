//! The context loader engine.
//!
//! [`ContextLoader`] is the single public entry point: it owns the cache,
//! the circuit breaker, the concurrency gate, and the counters, and
//! composes sanitisation, path resolution, the four-way file fan-out,
//! bundle assembly, and integrity validation behind one `load` call.
//! Distinct loader instances share nothing.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::reports::{
    BreakerStats, CachingStats, ConcurrencyStats, DirectoryReport, ExpectedFileReport,
    HealthStatus, ServiceStatistics,
};
use crate::core::breaker::CircuitBreaker;
use crate::core::config::LoaderConfig;
use crate::core::counters::LoadCounters;
use crate::core::errors::{ContextError, Result};
use crate::core::identity::{resolve_character_dir, sanitize_identifier};
use crate::io::cache::ContextCache;
use crate::io::reader::read_bounded;
use crate::model::bundle::{CharacterContext, FileKind, LoadedFileInfo};
use crate::parsers;

/// Warning count above which a bundle is rejected outright.
const MAX_VALIDATION_WARNINGS: usize = 5;

/// Concurrency-bounded, circuit-broken, caching context loader.
pub struct ContextLoader {
    config: LoaderConfig,
    cache: ContextCache,
    breaker: Mutex<CircuitBreaker>,
    counters: LoadCounters,
    load_gate: Semaphore,
    active_loads: Mutex<HashSet<String>>,
}

/// Registry entry for one in-flight load, removed on drop so cancellation
/// cannot leak tokens.
struct ActiveLoadGuard<'a> {
    registry: &'a Mutex<HashSet<String>>,
    token: String,
}

impl<'a> ActiveLoadGuard<'a> {
    fn register(registry: &'a Mutex<HashSet<String>>) -> Self {
        let token = Uuid::new_v4().to_string();
        registry.lock().insert(token.clone());
        Self { registry, token }
    }
}

impl Drop for ActiveLoadGuard<'_> {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.token);
    }
}

impl ContextLoader {
    /// Create a loader from a validated configuration.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        config.validate()?;

        info!(
            base_path = %config.content_root.display(),
            max_file_size_mb = config.max_file_size_bytes as f64 / (1024.0 * 1024.0),
            caching = config.enable_caching,
            concurrent_limit = config.max_concurrent_loads,
            "context loader initialized"
        );

        Ok(Self {
            cache: ContextCache::new(config.cache_ttl(), config.cache_max_entries),
            breaker: Mutex::new(CircuitBreaker::new(
                config.circuit_breaker_threshold,
                config.breaker_recovery(),
            )),
            counters: LoadCounters::default(),
            load_gate: Semaphore::new(config.max_concurrent_loads),
            active_loads: Mutex::new(HashSet::new()),
            config,
        })
    }

    /// The loader's effective configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the consolidated context bundle for a character.
    ///
    /// A partial bundle returns normally; inspect
    /// [`CharacterContext::partial_load`] and `loaded_files` to see what was
    /// missing. A bundle where nothing parsed also returns normally, with
    /// `load_success` false.
    pub async fn load(&self, raw_identifier: &str) -> Result<CharacterContext> {
        self.counters.record_attempt();
        let started = Instant::now();

        self.breaker.lock().admit()?;

        let _permit = self
            .load_gate
            .acquire()
            .await
            .map_err(|_| ContextError::load_failed("load gate closed"))?;
        let _active = ActiveLoadGuard::register(&self.active_loads);

        let outcome = self.execute_load(raw_identifier).await;

        match &outcome {
            Ok((bundle, from_cache)) => {
                self.account_bundle(bundle, *from_cache);
                info!(
                    character_id = %bundle.character_id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    success = bundle.load_success,
                    partial = bundle.partial_load,
                    from_cache,
                    "context loading completed"
                );
            }
            Err(e) => {
                self.account_error(e);
                error!(raw_identifier, error = %e, "context loading failed");
            }
        }

        outcome.map(|(bundle, _)| bundle)
    }

    /// Drop all cached bundles.
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("context cache cleared");
    }

    /// Snapshot of counters, configuration, and resilience state.
    pub fn get_statistics(&self) -> ServiceStatistics {
        let load_statistics = self.counters.snapshot();
        let (breaker_state, failure_count) = {
            let breaker = self.breaker.lock();
            (breaker.state(), breaker.failure_count())
        };
        let active_load_ids: Vec<String> = self.active_loads.lock().iter().cloned().collect();

        ServiceStatistics {
            load_statistics,
            base_path: self.config.content_root.display().to_string(),
            max_file_size_bytes: self.config.max_file_size_bytes,
            supported_file_types: FileKind::ALL
                .iter()
                .map(|kind| kind.label().to_string())
                .collect(),
            caching: CachingStats {
                enabled: self.config.enable_caching,
                cache_size: self.cache.len(),
                cache_ttl_minutes: self.config.cache_ttl_minutes,
                hit_rate: load_statistics.hit_rate(),
            },
            concurrency: ConcurrencyStats {
                max_concurrent_loads: self.config.max_concurrent_loads,
                active_loads: active_load_ids.len(),
                active_load_ids,
            },
            circuit_breaker: BreakerStats {
                state: breaker_state,
                failure_count,
                threshold: self.config.circuit_breaker_threshold,
            },
            service_status: HealthStatus::derive(
                breaker_state,
                load_statistics.security_violations,
                self.active_loads.lock().len(),
                self.config.max_concurrent_loads,
            ),
        }
    }

    /// Probe which context files exist for a character without reading any
    /// content or touching the counters.
    pub async fn validate_directory(&self, raw_identifier: &str) -> Result<DirectoryReport> {
        let character_id = sanitize_identifier(raw_identifier)?;
        let directory = self.config.content_root.join(&character_id);

        let directory_exists = tokio::fs::metadata(&directory)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        let mut expected_files = indexmap::IndexMap::new();
        let mut files_found = 0;
        for kind in FileKind::ALL {
            let file_name = kind.file_name(&character_id);
            let path = directory.join(&file_name);
            let (exists, file_size) = match tokio::fs::metadata(&path).await {
                Ok(metadata) => (true, metadata.len()),
                Err(_) => (false, 0),
            };
            if exists {
                files_found += 1;
            }
            expected_files.insert(
                kind.label().to_string(),
                ExpectedFileReport {
                    file_name,
                    exists,
                    file_path: path.display().to_string(),
                    file_size,
                },
            );
        }

        Ok(DirectoryReport {
            character_id,
            directory_exists,
            directory_path: directory.display().to_string(),
            expected_files,
            files_found,
            total_expected: FileKind::ALL.len(),
            validation_success: files_found > 0,
        })
    }

    /// Sanitise, consult the cache, resolve the directory, fan out the four
    /// file tasks under the request deadline, assemble, and validate.
    async fn execute_load(&self, raw_identifier: &str) -> Result<(CharacterContext, bool)> {
        let character_id = sanitize_identifier(raw_identifier)?;

        if self.config.enable_caching {
            if let Some(bundle) = self.cache.get(&character_id) {
                self.counters.record_cache_hit();
                debug!(character_id = %character_id, "cache hit");
                return Ok((bundle, true));
            }
            self.counters.record_cache_miss();
        }

        let character_dir =
            resolve_character_dir(&self.config.content_root, raw_identifier, &character_id)?;

        let bundle = tokio::time::timeout(
            self.config.request_deadline(),
            self.load_all_files(&character_dir, &character_id),
        )
        .await
        .map_err(|_| ContextError::Timeout {
            deadline_secs: self.config.per_request_deadline_seconds,
        })?;

        let bundle = self.validate_integrity(bundle)?;

        if self.config.enable_caching && bundle.load_success {
            self.cache.store(&character_id, &bundle);
        }

        Ok((bundle, false))
    }

    /// Read and parse all four context files in parallel and assemble the
    /// bundle. File entries keep the fixed bundle order regardless of
    /// completion order.
    async fn load_all_files(&self, dir: &Path, character_id: &str) -> CharacterContext {
        let (memory, objectives, profile, stats) = tokio::join!(
            self.load_kind(dir, character_id, FileKind::Memory, parsers::memory::parse_memory),
            self.load_kind(
                dir,
                character_id,
                FileKind::Objectives,
                parsers::objectives::parse_objectives,
            ),
            self.load_kind(
                dir,
                character_id,
                FileKind::Profile,
                parsers::profile::parse_profile,
            ),
            self.load_kind(dir, character_id, FileKind::Stats, parsers::stats::parse_stats),
        );

        CharacterContext::from_parts(character_id, memory, objectives, profile, stats)
    }

    /// Read one context file and run its parser. Every failure mode maps to
    /// a failed file entry; only the sub-context is lost.
    async fn load_kind<T>(
        &self,
        dir: &Path,
        character_id: &str,
        kind: FileKind,
        parse: impl FnOnce(&str) -> Result<T>,
    ) -> (Option<T>, LoadedFileInfo) {
        let file_name = kind.file_name(character_id);
        let path = dir.join(&file_name);
        let path_display = path.display().to_string();

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(file = %path_display, "optional context file not found");
            return (
                None,
                LoadedFileInfo::failure(file_name, path_display, 0, "File not found"),
            );
        }

        match read_bounded(&path, kind.label(), self.config.max_file_size_bytes).await {
            Ok(read) => match parse(&read.content) {
                Ok(parsed) => (
                    Some(parsed),
                    LoadedFileInfo::success(file_name, path_display, read.size),
                ),
                Err(e) => {
                    warn!(file = %path_display, error = %e, "context file failed to parse");
                    (
                        None,
                        LoadedFileInfo::failure(file_name, path_display, read.size, e.to_string()),
                    )
                }
            },
            Err(failure) => {
                warn!(file = %path_display, error = %failure.error, "context file failed to read");
                (
                    None,
                    LoadedFileInfo::failure(
                        file_name,
                        path_display,
                        failure.size,
                        failure.error.to_string(),
                    ),
                )
            }
        }
    }

    /// Cross-context consistency checks. Disagreements append warnings and
    /// clear the integrity flag; past [`MAX_VALIDATION_WARNINGS`] the load
    /// fails outright.
    fn validate_integrity(&self, mut bundle: CharacterContext) -> Result<CharacterContext> {
        let mut warnings = Vec::new();

        if let (Some(profile), Some(stats)) = (&bundle.profile_context, &bundle.stats_context) {
            if profile.name != stats.name {
                warnings.push(format!(
                    "name inconsistency: profile '{}' vs stats '{}'",
                    profile.name, stats.name
                ));
            }
            if profile.age != stats.age {
                warnings.push(format!(
                    "age inconsistency: profile {} vs stats {}",
                    profile.age, stats.age
                ));
            }
        }

        if !warnings.is_empty() {
            warn!(
                character_id = %bundle.character_id,
                warnings = warnings.len(),
                "context integrity warnings"
            );
            bundle.context_integrity = false;
            bundle.validation_warnings.extend(warnings);
        }

        if bundle.validation_warnings.len() > MAX_VALIDATION_WARNINGS {
            bundle.context_integrity = false;
            return Err(ContextError::ValidationFailed {
                warnings: bundle.validation_warnings,
            });
        }

        Ok(bundle)
    }

    /// Counter and breaker bookkeeping for a returned bundle. Cached
    /// bundles are classified for the accounting identity but say nothing
    /// about the filesystem, so they leave the breaker alone.
    fn account_bundle(&self, bundle: &CharacterContext, from_cache: bool) {
        if bundle.load_success && !bundle.partial_load {
            self.counters.record_success();
            if !from_cache {
                self.breaker.lock().record_success();
            }
        } else if bundle.partial_load {
            self.counters.record_partial();
            if !from_cache {
                self.breaker.lock().record_partial_failure();
            }
        } else {
            self.counters.record_failure();
            if !from_cache {
                self.breaker.lock().record_failure();
            }
        }
    }

    fn account_error(&self, error: &ContextError) {
        match error {
            ContextError::Security { .. } => self.counters.record_security_violation(),
            e if e.is_load_failure() => {
                self.counters.record_failure();
                self.breaker.lock().record_failure();
            }
            // Invalid identifiers are caller errors, not service failures.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader_for(root: &TempDir) -> ContextLoader {
        let config = LoaderConfig {
            content_root: root.path().to_path_buf(),
            ..LoaderConfig::default()
        };
        ContextLoader::new(config).unwrap()
    }

    fn write_character(root: &TempDir, id: &str) {
        let dir = root.path().join(id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(format!("{id}_stats.yaml")),
            "character:\n  name: \"Test Character\"\n  age: 25\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(format!("{id}_memory.md")),
            "At age 12 - apprenticed to the guild cartographers for life.\n",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = LoaderConfig {
            max_concurrent_loads: 0,
            ..LoaderConfig::default()
        };
        assert!(matches!(
            ContextLoader::new(config),
            Err(ContextError::Config { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_directory_counts_as_failed_load() {
        let root = TempDir::new().unwrap();
        let loader = loader_for(&root);

        let err = loader.load("ghost").await.unwrap_err();
        assert!(matches!(err, ContextError::DirectoryNotFound { .. }));

        let stats = loader.get_statistics();
        assert_eq!(stats.load_statistics.total_attempts, 1);
        assert_eq!(stats.load_statistics.failed_loads, 1);
        assert!((stats.circuit_breaker.failure_count - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_invalid_identifier_only_counts_attempt() {
        let root = TempDir::new().unwrap();
        let loader = loader_for(&root);

        let err = loader.load("   ").await.unwrap_err();
        assert!(matches!(err, ContextError::InvalidIdentifier { .. }));

        let stats = loader.get_statistics();
        assert_eq!(stats.load_statistics.total_attempts, 1);
        assert_eq!(stats.load_statistics.failed_loads, 0);
        assert!((stats.circuit_breaker.failure_count - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_partial_load_informs_breaker_by_half() {
        let root = TempDir::new().unwrap();
        let loader = loader_for(&root);
        write_character(&root, "aria");

        let bundle = loader.load("aria").await.unwrap();
        assert!(bundle.load_success);
        assert!(bundle.partial_load);

        let stats = loader.get_statistics();
        assert_eq!(stats.load_statistics.partial_loads, 1);
        assert!((stats.circuit_breaker.failure_count - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_breaker() {
        let root = TempDir::new().unwrap();
        let loader = loader_for(&root);
        write_character(&root, "aria");

        loader.load("aria").await.unwrap();
        loader.load("aria").await.unwrap();

        let stats = loader.get_statistics();
        assert_eq!(stats.load_statistics.cache_hits, 1);
        assert_eq!(stats.load_statistics.cache_misses, 1);
        assert_eq!(stats.load_statistics.partial_loads, 2);
        // Only the fresh load moved the breaker.
        assert!((stats.circuit_breaker.failure_count - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_statistics_shape() {
        let root = TempDir::new().unwrap();
        let loader = loader_for(&root);

        let stats = loader.get_statistics();
        assert_eq!(
            stats.supported_file_types,
            vec!["memory", "objectives", "profile", "stats"]
        );
        assert_eq!(stats.concurrency.max_concurrent_loads, 5);
        assert_eq!(stats.concurrency.active_loads, 0);
        assert_eq!(stats.service_status, HealthStatus::Healthy);
        assert_eq!(stats.circuit_breaker.threshold, 10);
    }

    #[tokio::test]
    async fn test_validate_directory_probe() {
        let root = TempDir::new().unwrap();
        let loader = loader_for(&root);
        write_character(&root, "aria");

        let report = loader.validate_directory("Aria").await.unwrap();
        assert_eq!(report.character_id, "aria");
        assert!(report.directory_exists);
        assert_eq!(report.total_expected, 4);
        assert_eq!(report.files_found, 2);
        assert!(report.validation_success);
        assert!(report.expected_files["stats"].exists);
        assert!(!report.expected_files["objectives"].exists);

        // Probes do not touch the load counters.
        assert_eq!(loader.get_statistics().load_statistics.total_attempts, 0);
    }

    #[tokio::test]
    async fn test_validate_directory_missing_character() {
        let root = TempDir::new().unwrap();
        let loader = loader_for(&root);

        let report = loader.validate_directory("ghost").await.unwrap();
        assert!(!report.directory_exists);
        assert_eq!(report.files_found, 0);
        assert!(!report.validation_success);
    }
}
