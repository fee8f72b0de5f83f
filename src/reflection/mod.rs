//! Knowledge-gap analysis.
//!
//! Gap analysis decides *what is still missing* after a research round. The
//! engine consumes gaps through the [`GapAnalyzer`] collaborator trait, so
//! an external reflection service (typically LLM-backed) can plug in; the
//! bundled [`CoverageGapAnalyzer`] is a deterministic keyword-coverage
//! heuristic that needs no external calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{MergedResult, Result};

/// A described aspect of the research topic not yet adequately covered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeGap {
    /// Human-readable gap descriptor; also usable as a follow-up query.
    pub description: String,
    /// Gap severity in [0, 1]; higher gaps are queried first.
    pub severity: f32,
}

impl KnowledgeGap {
    /// Create a gap with severity clamped into [0, 1].
    pub fn new(description: impl Into<String>, severity: f32) -> Self {
        Self {
            description: description.into(),
            severity: severity.clamp(0.0, 1.0),
        }
    }
}

/// Reflection collaborator boundary.
///
/// Implementations inspect the current merged results for a topic and
/// report what remains unknown. Failures are recovered by the caller as an
/// empty gap set; they never abort a session.
#[async_trait]
pub trait GapAnalyzer: Send + Sync {
    /// Collaborator name used in logs.
    fn name(&self) -> &str;

    /// Identify knowledge gaps left by `results` for `topic`.
    async fn analyze(&self, topic: &str, results: &[MergedResult]) -> Result<Vec<KnowledgeGap>>;
}

// ============= Coverage Gap Analyzer =============

/// Research facets every topic is expected to cover, with severities.
const FACETS: &[(&str, f32)] = &[
    ("overview and key definitions", 0.9),
    ("recent developments", 0.8),
    ("limitations and open problems", 0.7),
    ("practical applications", 0.6),
    ("competing approaches", 0.5),
];

/// Deterministic keyword-coverage gap analyzer.
///
/// A facet counts as covered when some merged result mentions at least half
/// of the facet's terms. Uncovered facets become gaps phrased as follow-up
/// queries for the topic, most severe first.
#[derive(Debug, Clone, Default)]
pub struct CoverageGapAnalyzer;

impl CoverageGapAnalyzer {
    /// Create the analyzer.
    pub fn new() -> Self {
        Self
    }

    fn facet_covered(facet: &str, results: &[MergedResult]) -> bool {
        let terms: Vec<String> = facet
            .split_whitespace()
            .filter(|w| w.len() > 3)
            .map(|w| w.to_lowercase())
            .collect();
        if terms.is_empty() {
            return true;
        }

        results.iter().any(|result| {
            let content = result.content.to_lowercase();
            let hits = terms.iter().filter(|t| content.contains(t.as_str())).count();
            hits * 2 >= terms.len()
        })
    }
}

#[async_trait]
impl GapAnalyzer for CoverageGapAnalyzer {
    fn name(&self) -> &str {
        "coverage"
    }

    async fn analyze(&self, topic: &str, results: &[MergedResult]) -> Result<Vec<KnowledgeGap>> {
        let mut gaps: Vec<KnowledgeGap> = FACETS
            .iter()
            .filter(|(facet, _)| !Self::facet_covered(facet, results))
            .map(|(facet, severity)| KnowledgeGap::new(format!("{facet} of {topic}"), *severity))
            .collect();

        gaps.sort_by(|a, b| {
            b.severity
                .partial_cmp(&a.severity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(gaps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(content: &str) -> MergedResult {
        MergedResult {
            content: content.to_string(),
            sources: vec!["https://example.com".to_string()],
            confidence: 0.8,
            relevance: 0.8,
            content_quality: 0.8,
            quality_score: 0.8,
            key_points: vec![],
            original_count: 1,
            iteration: 0,
        }
    }

    #[tokio::test]
    async fn test_empty_results_yield_all_facets() {
        let analyzer = CoverageGapAnalyzer::new();
        let gaps = analyzer.analyze("rust async runtimes", &[]).await.unwrap();

        assert_eq!(gaps.len(), FACETS.len());
        // Most severe first.
        assert!(gaps.windows(2).all(|w| w[0].severity >= w[1].severity));
        assert!(gaps[0].description.contains("rust async runtimes"));
    }

    #[tokio::test]
    async fn test_covered_facet_not_reported() {
        let analyzer = CoverageGapAnalyzer::new();
        let results = vec![result(
            "An overview of the field with key definitions and recent developments in tooling.",
        )];

        let gaps = analyzer.analyze("topic", &results).await.unwrap();

        assert!(gaps.iter().all(|g| !g.description.contains("overview")));
        assert!(gaps.len() < FACETS.len());
    }

    #[test]
    fn test_gap_severity_clamped() {
        let gap = KnowledgeGap::new("anything", 2.5);
        assert_eq!(gap.severity, 1.0);
    }
}
