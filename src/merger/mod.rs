//! Follow-up result merging.
//!
//! This module reduces a batch of retrieved research results to a compact,
//! deduplicated, quality-ranked set:
//!
//! 1. **Normalize** - strip follow-up markers, collapse whitespace and
//!    repeated lines, drop records below the minimum content length.
//! 2. **Deduplicate** - collapse records sharing a keyword fingerprint.
//! 3. **Group** - partition near-duplicates via [`SemanticGrouper`].
//! 4. **Merge** - synthesize one representative per group via
//!    [`MergeStrategy`].
//! 5. **Rank & filter** - order by composite quality, drop results below the
//!    quality threshold, cap the result count.
//!
//! Existing merged results entering a new pass are re-wrapped as fresh input
//! records; records are superseded, never mutated.

/// Greedy semantic clustering of result records.
pub mod grouping;
/// Weighted quality scoring.
pub mod quality;
/// Pairwise similarity with a bounded LRU cache.
pub mod similarity;
/// Per-group synthesis of representative results.
pub mod strategy;

pub use grouping::SemanticGrouper;
pub use quality::QualityAssessor;
pub use similarity::{CacheStats, SimilarityScorer};
pub use strategy::MergeStrategy;

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MergerConfig;
use crate::types::{MergedResult, ResultRecord};

// ============= Merge Statistics =============

/// Quality distribution buckets over a merged result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityDistribution {
    /// Results with content quality above 0.7.
    pub high: usize,
    /// Results with content quality in [0.4, 0.7].
    pub medium: usize,
    /// Results with content quality below 0.4.
    pub low: usize,
}

/// Summary of one merged result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeStatistics {
    /// Input records represented by the set.
    pub total_original_results: usize,
    /// Merged results in the set.
    pub total_merged_results: usize,
    /// Input records per merged result.
    pub compression_ratio: f32,
    /// Mean confidence across the set.
    pub average_confidence: f32,
    /// Mean relevance across the set.
    pub average_relevance: f32,
    /// Count of distinct sources across the set.
    pub source_diversity: usize,
    /// Content-quality buckets.
    pub quality_distribution: QualityDistribution,
}

/// Cumulative counters for a merger instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceStats {
    /// Merge passes executed.
    pub total_merges: u64,
    /// Similarity-cache counters.
    pub cache: CacheStats,
    /// Records dropped as fingerprint duplicates.
    pub deduplicated: u64,
    /// Merged results dropped by quality filtering.
    pub quality_filtered: u64,
}

#[derive(Default)]
struct Counters {
    total_merges: u64,
    deduplicated: u64,
    quality_filtered: u64,
}

// ============= Follow-up Merger =============

/// The follow-up result merge engine.
///
/// Construct once per session from a validated [`MergerConfig`]; the
/// similarity cache and counters live for the merger's lifetime.
pub struct FollowUpMerger {
    config: MergerConfig,
    scorer: SimilarityScorer,
    assessor: QualityAssessor,
    grouper: SemanticGrouper,
    strategy: MergeStrategy,
    counters: Mutex<Counters>,
}

impl FollowUpMerger {
    /// Create a merger from a validated configuration.
    pub fn new(config: MergerConfig) -> Self {
        Self {
            scorer: SimilarityScorer::new(&config),
            assessor: QualityAssessor::new(&config),
            grouper: SemanticGrouper::new(&config),
            strategy: MergeStrategy::new(&config),
            counters: Mutex::new(Counters::default()),
            config,
        }
    }

    /// Merge new records into an existing merged set.
    ///
    /// `existing` results are re-wrapped as input records so the whole
    /// working set is re-grouped together; the returned set supersedes both
    /// inputs. `iteration` tags every synthesized result.
    pub fn merge(
        &self,
        existing: Vec<MergedResult>,
        incoming: Vec<ResultRecord>,
        query_context: Option<&str>,
        iteration: u32,
    ) -> Vec<MergedResult> {
        info!(
            existing = existing.len(),
            incoming = incoming.len(),
            "merging follow-up results"
        );
        self.counters.lock().total_merges += 1;

        let mut records: Vec<ResultRecord> = existing.into_iter().map(rewrap).collect();
        records.extend(incoming);
        let input_count = records.len();

        let normalized = self.normalize(records);
        let deduplicated = self.deduplicate(normalized);
        debug!(
            kept = deduplicated.len(),
            input = input_count,
            "normalization and deduplication complete"
        );

        let groups = self.grouper.group(deduplicated, &self.scorer);

        let mut merged: Vec<MergedResult> = groups
            .into_iter()
            .filter_map(|group| {
                self.strategy
                    .merge(group, query_context, iteration, &self.scorer, &self.assessor)
            })
            .collect();

        merged.sort_by(|a, b| {
            b.quality_score
                .partial_cmp(&a.quality_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if self.config.enable_quality_filtering {
            let before = merged.len();
            merged.retain(|m| m.quality_score >= self.config.quality_threshold);
            self.counters.lock().quality_filtered += (before - merged.len()) as u64;
        }

        merged.truncate(self.config.max_merged_results);

        info!(
            input = input_count,
            output = merged.len(),
            "merge pass complete"
        );
        merged
    }

    /// Clean record content and drop records below the minimum length.
    fn normalize(&self, records: Vec<ResultRecord>) -> Vec<ResultRecord> {
        records
            .into_iter()
            .filter_map(|record| {
                let cleaned = clean_content(&record.content);
                if cleaned.chars().count() >= self.config.min_content_length {
                    Some(ResultRecord {
                        content: cleaned,
                        ..record
                    })
                } else {
                    debug!(source = %record.source, "dropping record below minimum content length");
                    None
                }
            })
            .collect()
    }

    /// Drop records whose keyword fingerprint was already seen.
    fn deduplicate(&self, records: Vec<ResultRecord>) -> Vec<ResultRecord> {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(records.len());
        let mut dropped = 0_u64;

        for record in records {
            let fingerprint = similarity::content_fingerprint(&record.content);
            if seen.insert(fingerprint) {
                kept.push(record);
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            self.counters.lock().deduplicated += dropped;
        }
        kept
    }

    /// Summarize a merged result set.
    pub fn statistics(results: &[MergedResult]) -> MergeStatistics {
        if results.is_empty() {
            return MergeStatistics::default();
        }

        let total_original: usize = results.iter().map(|r| r.original_count).sum();
        let count = results.len();

        let sources: HashSet<&str> = results
            .iter()
            .flat_map(|r| r.sources.iter().map(|s| s.as_str()))
            .collect();

        let mut distribution = QualityDistribution::default();
        for result in results {
            if result.content_quality > 0.7 {
                distribution.high += 1;
            } else if result.content_quality >= 0.4 {
                distribution.medium += 1;
            } else {
                distribution.low += 1;
            }
        }

        MergeStatistics {
            total_original_results: total_original,
            total_merged_results: count,
            compression_ratio: total_original as f32 / count as f32,
            average_confidence: results.iter().map(|r| r.confidence).sum::<f32>() / count as f32,
            average_relevance: results.iter().map(|r| r.relevance).sum::<f32>() / count as f32,
            source_diversity: sources.len(),
            quality_distribution: distribution,
        }
    }

    /// Cumulative counters since construction or the last reset.
    pub fn performance(&self) -> PerformanceStats {
        let counters = self.counters.lock();
        PerformanceStats {
            total_merges: counters.total_merges,
            cache: self.scorer.stats(),
            deduplicated: counters.deduplicated,
            quality_filtered: counters.quality_filtered,
        }
    }

    /// Reset counters and drop the similarity cache.
    pub fn reset_stats(&self) {
        *self.counters.lock() = Counters::default();
        self.scorer.reset();
    }
}

/// Re-wrap a merged result as an input record for the next pass.
fn rewrap(merged: MergedResult) -> ResultRecord {
    let source = if merged.sources.is_empty() {
        "merged".to_string()
    } else {
        merged.sources.join("; ")
    };
    ResultRecord::new(merged.content, source, merged.confidence, merged.relevance)
        .with_iteration(merged.iteration)
}

/// Strip follow-up markers, collapse repeated lines, and normalize
/// whitespace.
fn clean_content(content: &str) -> String {
    let stripped = strip_follow_up_markers(content);

    // Collapse consecutive duplicate lines before flattening whitespace.
    let mut lines = Vec::new();
    let mut prev = "";
    for line in stripped.lines() {
        let line = line.trim();
        if !line.is_empty() && line != prev {
            lines.push(line);
            prev = line;
        }
    }

    lines
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove `[Follow-up N.M]` annotations injected by upstream query fan-out.
fn strip_follow_up_markers(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("[Follow-up") {
        out.push_str(&rest[..start]);
        match rest[start..].find(']') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                rest = &rest[start..];
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
