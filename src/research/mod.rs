//! Iterative research coordination.
//!
//! The research loop alternates between judging whether accumulated
//! knowledge suffices and closing the gaps it finds:
//!
//! 1. **Evaluate** - the gap analyzer reports what is missing; the
//!    [`SufficiencyEvaluator`] checks coverage against the current merged
//!    results.
//! 2. **Query** - unresolved priority areas become follow-up queries to the
//!    search collaborator, bounded per iteration and per session.
//! 3. **Merge** - new records fold into the working set through the
//!    follow-up merger, and the loop re-evaluates.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use iris::{ConfigManager, CoverageGapAnalyzer, IterationController, StaticSearchProvider};
//!
//! let mut controller = IterationController::new(
//!     Arc::new(ConfigManager::new("iris.toml")?),
//!     Arc::new(StaticSearchProvider::with_records(seed_records)),
//!     Arc::new(CoverageGapAnalyzer::new()),
//! )?;
//!
//! let outcome = controller.run("solid-state battery markets", initial).await?;
//! for result in outcome.results {
//!     println!("[{:.2}] {}", result.quality_score, result.content);
//! }
//! ```

/// The phase machine driving one research session.
pub mod controller;
/// Coverage-based sufficiency evaluation.
pub mod sufficiency;

pub use controller::{IterationController, IterationState, Phase, SessionOutcome};
pub use sufficiency::SufficiencyEvaluator;
