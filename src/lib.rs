//! # Dramatis: Character Context Bundle Loader
//!
//! An async loader for per-character "context bundles": four structured
//! files describing a character (memory, objectives, profile, stats) that
//! are read in parallel, parsed tolerantly into typed sub-contexts, and
//! consolidated into a single validated [`CharacterContext`]. Built for
//! narrative and agent services that request many bundles concurrently:
//!
//! - **Identifier safety**: user-supplied identifiers are sanitised into a
//!   canonical filesystem-safe form and resolved strictly under the content
//!   root, so hostile input can never escape it
//! - **Partial-success semantics**: a malformed or missing file fails only
//!   its own sub-context; the bundle reports exactly what loaded
//! - **Bounded concurrency**: a process-wide semaphore caps in-flight loads
//! - **Load shedding**: a three-state circuit breaker rejects work while the
//!   backing filesystem misbehaves
//! - **TTL caching**: recent bundles are served from a size-capped cache
//!
//! ## Architecture
//!
//! ```text
//! identifier -> sanitise -> breaker admit? -> cache -> safety gate
//!            -> semaphore -> {read -> parse} x4 (deadline) -> assemble
//!            -> integrity validation -> cache store -> stats -> bundle
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dramatis::{ContextLoader, LoaderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ContextLoader::new(LoaderConfig::default())?;
//!     let bundle = loader.load("Aria Shadowbane").await?;
//!
//!     println!(
//!         "loaded {} (partial: {})",
//!         bundle.character_name, bundle.partial_load
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

// Core loader machinery
pub mod core {
    //! Configuration, errors, identifier handling, and resilience state.

    pub mod breaker;
    pub mod config;
    pub mod counters;
    pub mod errors;
    pub mod identity;
}

// Typed bundle and sub-context models
pub mod model {
    //! Typed representations of bundles and their four sub-contexts.

    pub mod bundle;
    pub mod memory;
    pub mod objectives;
    pub mod profile;
    pub mod stats;
}

// One parser per sub-context kind
pub mod parsers {
    //! Tolerant parsers, one per context file kind.

    pub mod memory;
    pub mod objectives;
    pub mod profile;
    pub mod stats;
}

// File reading and caching
pub mod io {
    //! Bounded file reading and bundle caching.

    pub mod cache;
    pub mod reader;
}

// Public engine interface
pub mod api {
    //! The loader engine and its observable reports.

    pub mod loader;
    pub mod reports;
}

// Re-export primary types for convenience
pub use crate::api::loader::ContextLoader;
pub use crate::api::reports::{DirectoryReport, HealthStatus, ServiceStatistics};
pub use crate::core::config::LoaderConfig;
pub use crate::core::errors::{ContextError, Result};
pub use crate::model::bundle::{CharacterContext, FileKind, LoadedFileInfo};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
