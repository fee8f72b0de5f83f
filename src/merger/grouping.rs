//! Semantic grouping of result records.
//!
//! Greedy seed-based clustering: records are processed in input order, each
//! ungrouped record seeds a new group and absorbs every remaining record
//! whose similarity to the seed reaches the configured threshold. The output
//! is always a partition of the input - every record lands in exactly one
//! group.

use tracing::debug;

use crate::config::MergerConfig;
use crate::merger::similarity::SimilarityScorer;
use crate::types::ResultRecord;

/// Partitions records into groups of near-duplicate content.
#[derive(Debug, Clone)]
pub struct SemanticGrouper {
    threshold: f32,
    enabled: bool,
}

impl SemanticGrouper {
    /// Create a grouper from the merger configuration.
    pub fn new(config: &MergerConfig) -> Self {
        Self {
            threshold: config.similarity_threshold,
            enabled: config.enable_semantic_grouping,
        }
    }

    /// Partition `records` into semantic groups.
    ///
    /// With grouping disabled every record becomes its own singleton group,
    /// which degrades the merge stage into a pass-through/filter.
    pub fn group(
        &self,
        records: Vec<ResultRecord>,
        scorer: &SimilarityScorer,
    ) -> Vec<Vec<ResultRecord>> {
        if !self.enabled {
            return records.into_iter().map(|r| vec![r]).collect();
        }

        let total = records.len();
        let mut groups = Vec::new();
        let mut ungrouped = records;

        while !ungrouped.is_empty() {
            let seed = ungrouped.remove(0);
            let mut group = vec![seed];

            let mut remaining = Vec::with_capacity(ungrouped.len());
            for record in ungrouped {
                let similarity = scorer.score(&group[0].content, &record.content);
                if similarity >= self.threshold {
                    group.push(record);
                } else {
                    remaining.push(record);
                }
            }

            ungrouped = remaining;
            groups.push(group);
        }

        debug!(
            records = total,
            groups = groups.len(),
            "semantic grouping complete"
        );
        groups
    }
}
