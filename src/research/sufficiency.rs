//! Sufficiency evaluation over merged results and knowledge gaps.

use tracing::debug;

use crate::config::IterationConfig;
use crate::merger::similarity::keywords;
use crate::reflection::KnowledgeGap;
use crate::types::{MergedResult, SufficiencyVerdict};

/// Decides whether accumulated results cover the identified knowledge gaps.
#[derive(Debug, Clone)]
pub struct SufficiencyEvaluator {
    sufficiency_threshold: f32,
    max_priority_areas: usize,
}

impl SufficiencyEvaluator {
    /// Create an evaluator from the iteration configuration.
    pub fn new(config: &IterationConfig) -> Self {
        Self {
            sufficiency_threshold: config.sufficiency_threshold,
            max_priority_areas: config.max_queries_per_iteration as usize,
        }
    }

    /// Evaluate coverage of `gaps` by `results`.
    ///
    /// A gap counts as addressed when some result whose quality reaches the
    /// sufficiency threshold covers the gap's descriptor keywords. The
    /// verdict carries unresolved gaps as priority areas, most severe first,
    /// capped at the per-iteration query budget.
    pub fn evaluate(
        &self,
        results: &[MergedResult],
        gaps: &[KnowledgeGap],
    ) -> SufficiencyVerdict {
        if gaps.is_empty() {
            return SufficiencyVerdict::all_covered();
        }

        let qualified: Vec<&MergedResult> = results
            .iter()
            .filter(|r| r.quality_score >= self.sufficiency_threshold)
            .collect();

        let mut unresolved: Vec<&KnowledgeGap> = gaps
            .iter()
            .filter(|gap| !qualified.iter().any(|r| addresses(r, gap)))
            .collect();

        let coverage = (gaps.len() - unresolved.len()) as f32 / gaps.len() as f32;
        let sufficient = unresolved.is_empty();

        unresolved.sort_by(|a, b| {
            b.severity
                .partial_cmp(&a.severity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let priority_areas: Vec<String> = unresolved
            .into_iter()
            .take(self.max_priority_areas)
            .map(|gap| gap.description.clone())
            .collect();

        debug!(
            gaps = gaps.len(),
            coverage,
            sufficient,
            priority_areas = priority_areas.len(),
            "sufficiency evaluated"
        );

        SufficiencyVerdict {
            sufficient,
            priority_areas,
            coverage,
        }
    }
}

/// A result addresses a gap when it mentions at least half of the gap
/// descriptor's keywords.
fn addresses(result: &MergedResult, gap: &KnowledgeGap) -> bool {
    let terms = keywords(&gap.description);
    if terms.is_empty() {
        return true;
    }

    let content = result.content.to_lowercase();
    let hits = terms.iter().filter(|t| content.contains(t.as_str())).count();
    hits * 2 >= terms.len()
}
