//! # I.R.I.S - Iterative Research & Intelligent Synthesis
//!
//! A sufficiency-driven follow-up research merge engine: given search
//! results for a topic, I.R.I.S deduplicates and semantically groups them,
//! merges each group into one representative result, judges whether the
//! accumulated knowledge covers the topic's gaps, and issues bounded
//! follow-up queries until it does.
//!
//! ## Overview
//!
//! I.R.I.S can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `iris` binary
//! 2. **As a library** - Import the engine into your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use iris::{
//!     ConfigManager, CoverageGapAnalyzer, DaedraSearchProvider, IterationController,
//!     SearchProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = Arc::new(ConfigManager::new("iris.toml")?);
//!     let search: Arc<dyn SearchProvider> = Arc::new(DaedraSearchProvider::new());
//!
//!     let initial = search.search("solid-state battery markets", 3).await?;
//!     let mut controller = IterationController::new(
//!         manager,
//!         search,
//!         Arc::new(CoverageGapAnalyzer::new()),
//!     )?;
//!
//!     let outcome = controller.run("solid-state battery markets", initial).await?;
//!     for result in outcome.results {
//!         println!("[{:.2}] {}", result.quality_score, result.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Merging Only
//!
//! The merge engine is usable without the iteration loop:
//!
//! ```rust,ignore
//! use iris::{FollowUpMerger, IrisConfig};
//!
//! let config = IrisConfig::default();
//! let merger = FollowUpMerger::new(config.merger);
//! let merged = merger.merge(Vec::new(), records, Some("query context"), 0);
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Validated configuration, presets, hot reload
//! - [`merger`] - Similarity, quality, grouping, and merge strategy
//! - [`reflection`] - Knowledge-gap analysis collaborator boundary
//! - [`research`] - Sufficiency evaluation and the iteration controller
//! - [`search`] - Search collaborator boundary (DuckDuckGo via daedra)
//! - [`types`] - Common types and error handling
//!
//! ## Presets
//!
//! | Preset | Trade-off |
//! |--------|-----------|
//! | `balanced` | Default thresholds and caps |
//! | `conservative` | Stricter thresholds, fewer iterations |
//! | `aggressive` | Looser thresholds, more follow-ups |
//! | `performance` | Trimmed merging, short timeouts |
//! | `quality` | Strict filtering, richer synthesized results |
//!
//! Preset switches through [`ConfigManager`] apply at the next iteration
//! boundary of a running session, never mid-merge.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line interface (argument parsing, colored output).
pub mod cli;
/// Configuration loading, validation, presets, and hot reload.
pub mod config;
/// Follow-up result merging: similarity, quality, grouping, synthesis.
pub mod merger;
/// Knowledge-gap analysis collaborator boundary.
pub mod reflection;
/// Sufficiency evaluation and the iteration controller.
pub mod research;
/// Search collaborator boundary.
pub mod search;
/// Core types (records, merged results, errors).
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, ConfigManager, IrisConfig, IterationConfig, MergerConfig, Preset};
pub use merger::{
    CacheStats, FollowUpMerger, MergeStatistics, MergeStrategy, PerformanceStats, QualityAssessor,
    SemanticGrouper, SimilarityScorer,
};
pub use reflection::{CoverageGapAnalyzer, GapAnalyzer, KnowledgeGap};
pub use research::{
    IterationController, IterationState, Phase, SessionOutcome, SufficiencyEvaluator,
};
pub use search::{DaedraSearchProvider, SearchProvider, StaticSearchProvider};
pub use types::{MergedResult, ResearchError, Result, ResultRecord, SufficiencyVerdict};
