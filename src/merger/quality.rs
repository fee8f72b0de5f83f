//! Quality scoring for result records and merged content.
//!
//! The composite score is a configured weighted sum of collaborator
//! confidence, query relevance, and a derived content-quality heuristic.
//! Scoring is a pure function of its inputs.

use crate::config::MergerConfig;
use crate::merger::strategy::split_sentences;
use crate::types::ResultRecord;

/// Weighted quality scorer.
#[derive(Debug, Clone)]
pub struct QualityAssessor {
    confidence_weight: f32,
    relevance_weight: f32,
    content_quality_weight: f32,
}

impl QualityAssessor {
    /// Create an assessor from the configured weights.
    pub fn new(config: &MergerConfig) -> Self {
        Self {
            confidence_weight: config.confidence_weight,
            relevance_weight: config.relevance_weight,
            content_quality_weight: config.content_quality_weight,
        }
    }

    /// Composite quality score for a record, in [0, 1].
    pub fn assess(&self, record: &ResultRecord) -> f32 {
        self.composite(
            record.confidence,
            record.relevance,
            Self::content_quality(&record.content),
        )
    }

    /// Combine the three quality dimensions with the configured weights.
    pub fn composite(&self, confidence: f32, relevance: f32, content_quality: f32) -> f32 {
        let score = self.confidence_weight * confidence
            + self.relevance_weight * relevance
            + self.content_quality_weight * content_quality;
        score.clamp(0.0, 1.0)
    }

    /// Derived content-quality heuristic in [0, 1].
    ///
    /// Rewards mid-length content, information density (digits, acronyms),
    /// multi-sentence structure, and terminology density.
    pub fn content_quality(content: &str) -> f32 {
        if content.is_empty() {
            return 0.0;
        }

        let mut score = 0.0_f32;

        let length = content.chars().count();
        if (100..=500).contains(&length) {
            score += 0.3;
        } else if (501..=1000).contains(&length) {
            score += 0.2;
        } else if length > 50 {
            score += 0.1;
        }

        if content.chars().any(|c| c.is_ascii_digit()) {
            score += 0.2;
        }

        if has_acronym(content) {
            score += 0.1;
        }

        if split_sentences(content).len() >= 3 {
            score += 0.2;
        }

        let words: Vec<&str> = content.split_whitespace().collect();
        if !words.is_empty() {
            let long_words = words.iter().filter(|w| w.chars().count() > 6).count();
            if long_words as f32 / words.len() as f32 > 0.2 {
                score += 0.2;
            }
        }

        score.min(1.0)
    }
}

/// Two or more consecutive uppercase letters, e.g. "LLM" or "HTTP".
fn has_acronym(content: &str) -> bool {
    let mut run = 0;
    for c in content.chars() {
        if c.is_uppercase() {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessor() -> QualityAssessor {
        QualityAssessor::new(&MergerConfig::default())
    }

    #[test]
    fn test_empty_content_scores_zero() {
        assert_eq!(QualityAssessor::content_quality(""), 0.0);
    }

    #[test]
    fn test_dense_content_scores_high() {
        // Mid-length, digits, acronym, three sentences, technical words.
        let content = "Transformer architectures dominate NLP benchmarks since 2017. \
                       Attention mechanisms replaced recurrence entirely in production systems. \
                       Pretraining corpora exceed 1 trillion tokens for frontier deployments.";
        let quality = QualityAssessor::content_quality(content);
        assert!(quality >= 0.8, "expected dense content to score high, got {quality}");
    }

    #[test]
    fn test_short_content_scores_low() {
        let quality = QualityAssessor::content_quality("short note");
        assert!(quality <= 0.2);
    }

    #[test]
    fn test_composite_weighting() {
        let a = assessor();
        // Default weights 0.4 / 0.4 / 0.2.
        let score = a.composite(1.0, 0.5, 0.0);
        assert!((score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_composite_clamped() {
        let config = MergerConfig {
            confidence_weight: 1.0,
            relevance_weight: 1.0,
            content_quality_weight: 1.0,
            ..Default::default()
        };
        let a = QualityAssessor::new(&config);
        assert_eq!(a.composite(1.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_acronym_detection() {
        assert!(has_acronym("the HTTP protocol"));
        assert!(!has_acronym("Plain Sentence Casing"));
    }
}
