//! Synthesis of one representative result per semantic group.
//!
//! Singleton groups pass through unchanged. Multi-record groups pool their
//! sentences longest-member-first, drop exact and near-identical sentences,
//! cap the synthesized content at the configured sentence budget, and carry
//! every member's provenance forward.

use std::collections::HashSet;

use crate::config::MergerConfig;
use crate::merger::quality::QualityAssessor;
use crate::merger::similarity::SimilarityScorer;
use crate::types::{MergedResult, ResultRecord};

/// Split content into trimmed, non-empty sentences.
pub(crate) fn split_sentences(content: &str) -> Vec<String> {
    content
        .split(['.', '!', '?'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Synthesizes a [`MergedResult`] from a semantic group.
#[derive(Debug, Clone)]
pub struct MergeStrategy {
    max_sentences_per_result: usize,
    max_key_points: usize,
    similarity_threshold: f32,
    enable_deduplication: bool,
    preserve_source_info: bool,
}

impl MergeStrategy {
    /// Create a strategy from the merger configuration.
    pub fn new(config: &MergerConfig) -> Self {
        Self {
            max_sentences_per_result: config.max_sentences_per_result,
            max_key_points: config.max_key_points,
            similarity_threshold: config.similarity_threshold,
            enable_deduplication: config.enable_deduplication,
            preserve_source_info: config.preserve_source_info,
        }
    }

    /// Merge one group into a single representative result.
    ///
    /// The group's `quality_score` is the maximum of its members' composite
    /// scores: a merged result is never penalized below its best
    /// constituent.
    pub fn merge(
        &self,
        group: Vec<ResultRecord>,
        query_context: Option<&str>,
        iteration: u32,
        scorer: &SimilarityScorer,
        assessor: &QualityAssessor,
    ) -> Option<MergedResult> {
        if group.is_empty() {
            return None;
        }

        if group.len() == 1 {
            return self.merge_singleton(group, iteration, assessor);
        }

        let mut members: Vec<(ResultRecord, f32)> =
            group.into_iter().map(|r| {
                let score = assessor.assess(&r);
                (r, score)
            }).collect();
        let quality_score = members.iter().map(|(_, s)| *s).fold(0.0_f32, f32::max);

        // Longer members lead so detailed sentences win the budget; member
        // quality breaks ties.
        members.sort_by(|(a, qa), (b, qb)| {
            b.content
                .len()
                .cmp(&a.content.len())
                .then_with(|| qb.partial_cmp(qa).unwrap_or(std::cmp::Ordering::Equal))
        });
        let members: Vec<ResultRecord> = members.into_iter().map(|(r, _)| r).collect();

        let mut sentences = Vec::new();
        for member in &members {
            sentences.extend(split_sentences(&member.content));
        }
        let sentences = self.dedup_sentences(sentences, scorer);

        let mut content = sentences
            .iter()
            .take(self.max_sentences_per_result)
            .cloned()
            .collect::<Vec<_>>()
            .join(". ");
        if !content.is_empty() && !content.ends_with('.') {
            content.push('.');
        }

        let sources = if self.preserve_source_info {
            let mut seen = HashSet::new();
            members
                .iter()
                .map(|r| r.source.clone())
                .filter(|s| seen.insert(s.clone()))
                .collect()
        } else {
            Vec::new()
        };

        // More agreeing sources mean higher confidence, capped below 1.0.
        let confidence = (0.6 + 0.1 * members.len() as f32).min(0.9);
        let relevance = relevance_score(&content, query_context);
        let content_quality = QualityAssessor::content_quality(&content);
        let key_points = extract_key_points(&content, self.max_key_points);

        Some(MergedResult {
            content,
            sources,
            confidence,
            relevance,
            content_quality,
            quality_score,
            key_points,
            original_count: members.len(),
            iteration,
        })
    }

    fn merge_singleton(
        &self,
        group: Vec<ResultRecord>,
        iteration: u32,
        assessor: &QualityAssessor,
    ) -> Option<MergedResult> {
        let record = group.into_iter().next()?;
        let quality_score = assessor.assess(&record);
        let content_quality = QualityAssessor::content_quality(&record.content);
        let key_points = extract_key_points(&record.content, self.max_key_points);

        Some(MergedResult {
            sources: if self.preserve_source_info {
                vec![record.source]
            } else {
                Vec::new()
            },
            confidence: record.confidence,
            relevance: record.relevance,
            content_quality,
            quality_score,
            key_points,
            original_count: 1,
            iteration,
            content: record.content,
        })
    }

    /// Remove duplicate sentences, preserving first-seen order.
    ///
    /// Exact duplicates (case-insensitive) always collapse; near-identical
    /// sentences are additionally removed via the similarity scorer when
    /// deduplication is enabled.
    fn dedup_sentences(&self, sentences: Vec<String>, scorer: &SimilarityScorer) -> Vec<String> {
        let mut kept: Vec<String> = Vec::new();
        let mut seen = HashSet::new();

        for sentence in sentences {
            if sentence.chars().count() <= 10 {
                continue;
            }
            let key = sentence.to_lowercase();
            if !seen.insert(key) {
                continue;
            }
            if self.enable_deduplication
                && kept
                    .iter()
                    .any(|k| scorer.score(k, &sentence) >= self.similarity_threshold)
            {
                continue;
            }
            kept.push(sentence);
        }

        kept
    }
}

/// Keyword overlap with the query context, with a floor for context-free
/// merges.
fn relevance_score(content: &str, query_context: Option<&str>) -> f32 {
    let Some(context) = query_context else {
        return 0.7;
    };

    let context_words: HashSet<String> = context
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    if context_words.is_empty() {
        return 0.7;
    }

    let content_words: HashSet<String> = content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();

    let overlap = context_words.intersection(&content_words).count();
    (overlap as f32 / context_words.len() as f32 + 0.3).min(1.0)
}

/// Pick informative sentences as key points: mid-length sentences carrying a
/// digit or uppercase signal, from the head of the content.
fn extract_key_points(content: &str, max_key_points: usize) -> Vec<String> {
    split_sentences(content)
        .into_iter()
        .take(5)
        .filter(|s| {
            let len = s.chars().count();
            (20..200).contains(&len)
                && s.chars().any(|c| c.is_ascii_digit() || c.is_uppercase())
        })
        .take(max_key_points)
        .collect()
}
