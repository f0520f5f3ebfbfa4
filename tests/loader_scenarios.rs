//! End-to-end loader scenarios over real character directories.
//!
//! Each test builds a content root in a tempdir, drives the public
//! [`ContextLoader`] API, and checks bundle shape, counter accounting,
//! and resilience behaviour.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use dramatis::{ContextError, ContextLoader, LoaderConfig};

const PROFILE_MD: &str = "\
# Character Profile: Test Character

## Core Identity
- **Name**: Test Character
- **Age**: 25
- **Gender**: Non-binary
- **Race**: Human
- **Class**: Test Engineer

## Physical Description
Weathered coat, steady hands, and a cartographer's squint.

## Background
Raised in the survey halls of the northern guild.
";

const OBJECTIVES_MD: &str = "\
# Test Character - Objectives Framework

## Core Life Objectives

**Master of Testing**
Become expert at comprehensive verification of caravan ledgers.

## Strategic Objectives

**Build the Framework**
Create robust testing infrastructure for the guild.

## Tactical Objectives

**Audit the Ledgers**
Work through the current season's ledgers page by page.
";

const MEMORY_MD: &str = "\
# Test Character - Memory System

## Formative Events

At age 8 - learned systematic checking from the first guild mentor.
At age 14 - uncovered a forged ledger that nearly broke the guild.

## Relationships

**Elder Thorne** holds steady trust at 85, relationship: strategic partner from early years.
";

fn stats_yaml(name: &str, age: u32) -> String {
    format!(
        "character:\n  name: \"{name}\"\n  age: {age}\n  origin: \"Northern Guild\"\n  \
         faction: \"Surveyors\"\n  specialization: \"Cartography\"\n\
         combat_stats:\n  melee: 3\n  ranged: 5\n\
         psychological_profile:\n  diligence: 9\n"
    )
}

fn config_for(root: &TempDir) -> LoaderConfig {
    LoaderConfig {
        content_root: root.path().to_path_buf(),
        ..LoaderConfig::default()
    }
}

fn character_dir(root: &TempDir, id: &str) -> std::path::PathBuf {
    let dir = root.path().join(id);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_full_character(root: &TempDir, id: &str, stats_name: &str) {
    let dir = character_dir(root, id);
    std::fs::write(dir.join(format!("{id}_memory.md")), MEMORY_MD).unwrap();
    std::fs::write(dir.join(format!("{id}_objectives.md")), OBJECTIVES_MD).unwrap();
    std::fs::write(dir.join(format!("{id}_profile.md")), PROFILE_MD).unwrap();
    std::fs::write(dir.join(format!("{id}_stats.yaml")), stats_yaml(stats_name, 25)).unwrap();
}

#[tokio::test]
async fn scenario_full_happy_path() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "test_character", "Test Character");
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    let bundle = loader.load("Test Character").await.unwrap();

    assert_eq!(bundle.character_id, "test_character");
    assert_eq!(bundle.character_name, "Test Character");
    assert!(bundle.memory_context.is_some());
    assert!(bundle.objectives_context.is_some());
    assert!(bundle.profile_context.is_some());
    assert!(bundle.stats_context.is_some());
    assert!(bundle.load_success);
    assert!(!bundle.partial_load);
    assert!(bundle.context_integrity);
    assert!(bundle.validation_warnings.is_empty());

    assert_eq!(bundle.loaded_files.len(), 4);
    assert!(bundle.loaded_files.iter().all(|f| f.loaded_successfully));

    // File metadata keeps the fixed bundle order.
    let suffixes: Vec<&str> = bundle
        .loaded_files
        .iter()
        .map(|f| f.file_name.rsplit("test_character").next().unwrap())
        .collect();
    assert_eq!(
        suffixes,
        vec!["_memory.md", "_objectives.md", "_profile.md", "_stats.yaml"]
    );

    // The memory parser extracted and ordered the formative events.
    let memory = bundle.memory_context.as_ref().unwrap();
    let ages: Vec<u32> = memory.formative_events.iter().map(|e| e.age).collect();
    assert_eq!(ages, vec![8, 14]);
    assert_eq!(memory.relationships[0].trust_level.score, 85);

    let objectives = bundle.objectives_context.as_ref().unwrap();
    assert_eq!(objectives.core_objectives[0].name, "Master of Testing");
    assert_eq!(objectives.objective_count(), 3);

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.total_attempts, 1);
    assert_eq!(stats.load_statistics.successful_loads, 1);
    assert_eq!(stats.load_statistics.cache_misses, 1);
}

#[tokio::test]
async fn scenario_partial_load() {
    let root = TempDir::new().unwrap();
    let dir = character_dir(&root, "test_character");
    std::fs::write(dir.join("test_character_memory.md"), MEMORY_MD).unwrap();
    std::fs::write(
        dir.join("test_character_stats.yaml"),
        stats_yaml("Test Character", 25),
    )
    .unwrap();
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    let bundle = loader.load("test_character").await.unwrap();

    assert!(bundle.load_success);
    assert!(bundle.partial_load);
    assert!(bundle.memory_context.is_some());
    assert!(bundle.stats_context.is_some());
    assert!(bundle.objectives_context.is_none());
    assert!(bundle.profile_context.is_none());

    assert_eq!(bundle.loaded_files.len(), 4);
    let objectives_info = &bundle.loaded_files[1];
    assert!(!objectives_info.loaded_successfully);
    assert_eq!(objectives_info.error_message.as_deref(), Some("File not found"));
    assert_eq!(objectives_info.file_size_bytes, 0);

    // Display name falls back to the stats name with no profile present.
    assert_eq!(bundle.character_name, "Test Character");

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.partial_loads, 1);
    assert_eq!(stats.load_statistics.successful_loads, 0);
}

#[tokio::test]
async fn scenario_name_disagreement() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "test_character", "Different Name");
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    let bundle = loader.load("test_character").await.unwrap();

    assert!(bundle.load_success);
    assert!(!bundle.context_integrity);
    assert!(bundle
        .validation_warnings
        .iter()
        .any(|w| w.contains("name inconsistency")));

    // Profile wins display-name resolution.
    assert_eq!(bundle.character_name, "Test Character");
}

#[tokio::test]
async fn scenario_path_traversal_is_rejected() {
    let root = TempDir::new().unwrap();
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    let err = loader.load("../../../etc/passwd").await.unwrap_err();
    assert!(matches!(err, ContextError::Security { .. }));

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.security_violations, 1);
    assert_eq!(stats.load_statistics.failed_loads, 0);
    assert_eq!(stats.load_statistics.total_attempts, 1);
}

#[tokio::test]
async fn scenario_breaker_trip_and_recovery() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "survivor", "Test Character");
    let config = LoaderConfig {
        circuit_breaker_recovery_minutes: 0.002,
        ..config_for(&root)
    };
    let loader = ContextLoader::new(config).unwrap();

    for _ in 0..10 {
        let err = loader.load("ghost").await.unwrap_err();
        assert!(matches!(err, ContextError::DirectoryNotFound { .. }));
    }

    let stats = loader.get_statistics();
    assert_eq!(stats.circuit_breaker.state.as_str(), "open");
    assert_eq!(format!("{:?}", stats.service_status), "Degraded");

    // Admission is rejected before any filesystem work.
    let err = loader.load("survivor").await.unwrap_err();
    assert!(matches!(err, ContextError::ServiceUnavailable { .. }));

    // After the recovery timeout a probe load is admitted and a success
    // closes the breaker.
    tokio::time::sleep(Duration::from_millis(150)).await;
    let bundle = loader.load("survivor").await.unwrap();
    assert!(bundle.load_success);

    let stats = loader.get_statistics();
    assert_eq!(stats.circuit_breaker.state.as_str(), "closed");
    assert!((stats.circuit_breaker.failure_count - 0.0).abs() < f64::EPSILON);

    // Normal service resumed: failures are reported as themselves again.
    let err = loader.load("ghost").await.unwrap_err();
    assert!(matches!(err, ContextError::DirectoryNotFound { .. }));
}

#[tokio::test]
async fn scenario_cache_ttl_expiry() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "aria", "Test Character");
    let config = LoaderConfig {
        cache_ttl_minutes: 0.01,
        ..config_for(&root)
    };
    let loader = ContextLoader::new(config).unwrap();

    let first = loader.load("aria").await.unwrap();
    tokio::time::sleep(Duration::from_millis(700)).await;
    let second = loader.load("aria").await.unwrap();

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.cache_misses, 2);
    assert_eq!(stats.load_statistics.cache_hits, 0);

    // Same content from two independent read passes.
    assert_eq!(first.stats_context, second.stats_context);
    assert_eq!(first.memory_context, second.memory_context);
    assert_ne!(first.load_timestamp, second.load_timestamp);
}

#[tokio::test]
async fn cached_reload_is_byte_equal_and_counts_one_hit() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "aria", "Test Character");
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    let first = loader.load("aria").await.unwrap();
    let second = loader.load("aria").await.unwrap();

    assert_eq!(first, second);

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.cache_hits, 1);
    assert_eq!(stats.load_statistics.cache_misses, 1);
    assert!((stats.caching.hit_rate - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn clearing_cache_forces_two_read_passes() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "aria", "Test Character");
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    loader.load("aria").await.unwrap();
    loader.clear_cache();
    loader.load("aria").await.unwrap();

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.cache_misses, 2);
    assert_eq!(stats.load_statistics.cache_hits, 0);
    assert_eq!(stats.caching.cache_size, 1);
}

#[tokio::test]
async fn file_size_cap_boundary() {
    let root = TempDir::new().unwrap();
    let dir = character_dir(&root, "padded");

    // Pad the stats file to exactly the configured cap.
    let cap = 512u64;
    let base = stats_yaml("Test Character", 25);
    let padding = cap as usize - base.len() - 2;
    let exact = format!("{base}#{}\n", "x".repeat(padding));
    assert_eq!(exact.len() as u64, cap);
    std::fs::write(dir.join("padded_stats.yaml"), &exact).unwrap();

    let config = LoaderConfig {
        max_file_size_bytes: cap,
        enable_caching: false,
        ..config_for(&root)
    };
    let loader = ContextLoader::new(config).unwrap();

    let bundle = loader.load("padded").await.unwrap();
    assert!(bundle.stats_context.is_some());

    // One byte over fails the stats sub-context only.
    std::fs::write(dir.join("padded_stats.yaml"), format!("{exact}x")).unwrap();
    let bundle = loader.load("padded").await.unwrap();
    assert!(bundle.stats_context.is_none());
    let stats_info = &bundle.loaded_files[3];
    assert!(stats_info
        .error_message
        .as_deref()
        .unwrap()
        .contains("file too large"));
    assert_eq!(stats_info.file_size_bytes, cap + 1);
    assert!(!bundle.load_success);
}

#[tokio::test]
async fn malformed_stats_fails_only_its_sub_context() {
    let root = TempDir::new().unwrap();
    let dir = character_dir(&root, "broken");
    std::fs::write(dir.join("broken_memory.md"), MEMORY_MD).unwrap();
    std::fs::write(
        dir.join("broken_stats.yaml"),
        "character:\n  name: X\ncombat_stats:\n  melee: 99\n",
    )
    .unwrap();
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    let bundle = loader.load("broken").await.unwrap();
    assert!(bundle.load_success);
    assert!(bundle.partial_load);
    assert!(bundle.memory_context.is_some());
    assert!(bundle.stats_context.is_none());
    assert!(bundle.loaded_files[3]
        .error_message
        .as_deref()
        .unwrap()
        .contains("must be between 0-10"));
}

#[tokio::test]
async fn all_files_failing_returns_unsuccessful_bundle() {
    let root = TempDir::new().unwrap();
    let dir = character_dir(&root, "hollow");
    std::fs::write(dir.join("hollow_stats.yaml"), "   \n").unwrap();
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    let bundle = loader.load("hollow").await.unwrap();
    assert!(!bundle.load_success);
    assert!(!bundle.partial_load);
    assert_eq!(bundle.loaded_context_count(), 0);
    assert_eq!(bundle.character_name, "hollow");

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.failed_loads, 1);
    assert!((stats.circuit_breaker.failure_count - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn tiny_deadline_times_out() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "slowpoke", "Test Character");
    let config = LoaderConfig {
        per_request_deadline_seconds: 0.000001,
        ..config_for(&root)
    };
    let loader = ContextLoader::new(config).unwrap();

    let err = loader.load("slowpoke").await.unwrap_err();
    assert!(matches!(err, ContextError::Timeout { .. }));

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.failed_loads, 1);
}

#[tokio::test]
async fn attempt_accounting_identity_holds() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "aria", "Test Character");
    let loader = ContextLoader::new(config_for(&root)).unwrap();

    loader.load("aria").await.unwrap(); // successful
    loader.load("   ").await.unwrap_err(); // invalid identifier
    loader.load("../../etc").await.unwrap_err(); // security violation
    loader.load("ghost").await.unwrap_err(); // failed (directory not found)

    let s = loader.get_statistics().load_statistics;
    let classified = s.successful_loads + s.partial_loads + s.failed_loads;
    let rejected = 2; // invalid identifier + security violation
    assert_eq!(s.total_attempts, classified + rejected);
    assert_eq!(s.security_violations, 1);
}

#[tokio::test]
async fn concurrent_loads_share_the_gate_cleanly() {
    let root = TempDir::new().unwrap();
    write_full_character(&root, "aria", "Test Character");
    let config = LoaderConfig {
        max_concurrent_loads: 2,
        enable_caching: false,
        ..config_for(&root)
    };
    let loader = Arc::new(ContextLoader::new(config).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load("aria").await })
        })
        .collect();

    for handle in handles {
        let bundle = handle.await.unwrap().unwrap();
        assert!(bundle.load_success);
    }

    let stats = loader.get_statistics();
    assert_eq!(stats.load_statistics.total_attempts, 8);
    assert_eq!(stats.load_statistics.successful_loads, 8);
    assert_eq!(stats.concurrency.active_loads, 0);
}
