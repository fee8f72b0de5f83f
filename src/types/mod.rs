//! Core types for the research merge engine.
//!
//! Result records are immutable once created: a merge produces a new
//! [`MergedResult`] that supersedes its inputs, nothing is mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============= Result Types =============

/// One unit of retrieved knowledge, as delivered by a search collaborator
/// or synthesized by a merge pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Unique record identity.
    pub id: Uuid,
    /// Retrieved text content.
    pub content: String,
    /// Provenance identifier, usually a URL.
    pub source: String,
    /// Collaborator-assigned confidence in [0, 1].
    pub confidence: f32,
    /// Collaborator-assigned relevance to the query in [0, 1].
    pub relevance: f32,
    /// The follow-up iteration that produced this record (0 = initial round).
    pub iteration: u32,
    /// When the record was retrieved.
    pub retrieved_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Create a record with scores clamped into [0, 1].
    pub fn new(
        content: impl Into<String>,
        source: impl Into<String>,
        confidence: f32,
        relevance: f32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source: source.into(),
            confidence: confidence.clamp(0.0, 1.0),
            relevance: relevance.clamp(0.0, 1.0),
            iteration: 0,
            retrieved_at: Utc::now(),
        }
    }

    /// Tag the record with the iteration that produced it.
    pub fn with_iteration(mut self, iteration: u32) -> Self {
        self.iteration = iteration;
        self
    }
}

/// The representative result synthesized from one semantic group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedResult {
    /// Synthesized content, bounded by the configured sentence cap.
    pub content: String,
    /// Preserved provenance of every member, in member order.
    pub sources: Vec<String>,
    /// Aggregate confidence of the group.
    pub confidence: f32,
    /// Aggregate relevance of the group.
    pub relevance: f32,
    /// Derived content-quality heuristic for the merged content, in [0, 1].
    pub content_quality: f32,
    /// Composite quality score used for ranking and filtering, in [0, 1].
    pub quality_score: f32,
    /// Extracted key points, bounded by the configured key-point cap.
    pub key_points: Vec<String>,
    /// Number of input records this result supersedes.
    pub original_count: usize,
    /// The iteration of the merge pass that produced this result.
    pub iteration: u32,
}

// ============= Sufficiency Types =============

/// Outcome of a sufficiency evaluation over the current merged results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SufficiencyVerdict {
    /// Whether accumulated results adequately cover the knowledge gaps.
    pub sufficient: bool,
    /// Unresolved gap descriptors, most severe first, capped at the
    /// per-iteration query budget.
    pub priority_areas: Vec<String>,
    /// Fraction of gaps addressed, in [0, 1]. 1.0 when there were no gaps.
    pub coverage: f32,
}

impl SufficiencyVerdict {
    /// A verdict that stops iteration with full coverage.
    pub fn all_covered() -> Self {
        Self {
            sufficient: true,
            priority_areas: Vec::new(),
            coverage: 1.0,
        }
    }
}

// ============= Error Types =============

/// Errors surfaced by the research engine.
///
/// Only `ConfigurationInvalid` ends a session before natural termination;
/// collaborator failures are recovered locally as empty results and cache
/// corruption is recovered by clearing the cache.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// A threshold, weight, or cap failed validation at session start.
    #[error("Configuration invalid: {0}")]
    ConfigurationInvalid(String),

    /// A collaborator call exceeded its timeout.
    #[error("Collaborator call timed out after {seconds}s: {context}")]
    CollaboratorTimeout {
        /// Configured timeout that was exceeded.
        seconds: u64,
        /// The query or call that timed out.
        context: String,
    },

    /// A collaborator call returned a non-timeout error.
    #[error("Collaborator failure: {0}")]
    CollaboratorFailure(String),

    /// The similarity cache violated an internal invariant.
    #[error("Similarity cache corrupted: {0}")]
    CacheCorruption(String),

    /// Internal error that does not fit the other kinds.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResearchError>;
