//! Integration tests for the follow-up merge pipeline.

mod common;

use common::{long, record};
use iris::{FollowUpMerger, MergerConfig, QualityAssessor, ResultRecord, SimilarityScorer};

/// Two near-duplicate pairs (word overlap above 0.8) and one unique record.
fn scenario_records() -> Vec<ResultRecord> {
    let a1 = "amazon rainforest deforestation reached nine thousand square kilometers during \
              2025 according satellite monitoring agencies";
    let a2 = "amazon rainforest deforestation reached nine thousand square kilometers during \
              2025 according satellite monitoring agencies unfortunately";
    let b1 = "offshore wind turbine installations doubled european generating capacity since \
              2023 market analysts reported recently";
    let b2 = "offshore wind turbine installations doubled european generating capacity since \
              2023 market analysts reported recently surprisingly";
    let c = "quantum computing error correction milestones achieved logical qubit \
             demonstrations laboratory experiments worldwide";

    vec![
        record(a1, "https://a1.example.com"),
        record(b1, "https://b1.example.com"),
        record(a2, "https://a2.example.com"),
        record(b2, "https://b2.example.com"),
        record(c, "https://c.example.com"),
    ]
}

mod similarity_property_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("grid storage deployments accelerated", "storage deployments accelerated globally")]
    #[case("a b c", "c b a")]
    #[case("", "nonempty content")]
    #[case("identical content", "identical content")]
    fn test_symmetry(#[case] a: &str, #[case] b: &str) {
        let scorer = SimilarityScorer::new(&MergerConfig::default());
        assert_eq!(scorer.score(a, b), scorer.score(b, a));
    }

    #[rstest]
    #[case("single")]
    #[case("a longer piece of content with several words in it")]
    #[case("")]
    fn test_reflexivity(#[case] a: &str) {
        let scorer = SimilarityScorer::new(&MergerConfig::default());
        assert_eq!(scorer.score(a, a), 1.0);
    }

    #[test]
    fn test_scores_stay_bounded() {
        let scorer = SimilarityScorer::new(&MergerConfig::default());
        for a in ["x", "x y", "x y z w", "completely different"] {
            for b in ["x", "q r s", "x y z w v u"] {
                let score = scorer.score(a, b);
                assert!((0.0..=1.0).contains(&score), "score({a}, {b}) = {score}");
            }
        }
    }
}

mod grouping_scenario_tests {
    use super::*;

    fn scenario_config() -> MergerConfig {
        MergerConfig {
            similarity_threshold: 0.8,
            enable_quality_filtering: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_five_records_merge_into_three() {
        let merger = FollowUpMerger::new(scenario_config());
        let results = merger.merge(vec![], scenario_records(), Some("energy research"), 0);

        assert_eq!(results.len(), 3);

        // Both near-duplicate pairs collapsed into two-member results.
        let pair_results: Vec<_> = results.iter().filter(|r| r.original_count == 2).collect();
        assert_eq!(pair_results.len(), 2);
        assert!(results.iter().any(|r| r.original_count == 1));
    }

    #[test]
    fn test_merge_output_is_partition_of_input() {
        let merger = FollowUpMerger::new(scenario_config());
        let input_count = scenario_records().len();
        let results = merger.merge(vec![], scenario_records(), None, 0);

        let represented: usize = results.iter().map(|r| r.original_count).sum();
        assert_eq!(represented, input_count);
    }

    #[test]
    fn test_pair_results_keep_both_sources() {
        let merger = FollowUpMerger::new(scenario_config());
        let results = merger.merge(vec![], scenario_records(), None, 0);

        let amazon = results
            .iter()
            .find(|r| r.content.contains("rainforest"))
            .expect("rainforest group present");
        assert_eq!(amazon.sources.len(), 2);
        assert!(amazon.sources.iter().any(|s| s.contains("a1")));
        assert!(amazon.sources.iter().any(|s| s.contains("a2")));
    }

    #[test]
    fn test_quality_filtering_bounds_output() {
        let config = MergerConfig {
            similarity_threshold: 0.8,
            quality_threshold: 0.6,
            ..Default::default()
        };
        let merger = FollowUpMerger::new(config);
        let results = merger.merge(vec![], scenario_records(), Some("energy research"), 0);

        // Possibly fewer than three survive, but never a low-quality one.
        assert!(results.len() <= 3);
        assert!(results.iter().all(|r| r.quality_score >= 0.6));
    }
}

mod merge_behavior_tests {
    use super::*;

    #[test]
    fn test_singleton_merge_is_idempotent() {
        let config = MergerConfig {
            enable_quality_filtering: false,
            ..Default::default()
        };
        let assessor = QualityAssessor::new(&config);
        let merger = FollowUpMerger::new(config);

        // Already-normalized content so cleaning is the identity.
        let input = record(
            &long("Perovskite cells reached 29% efficiency in tandem modules."),
            "https://solo.example.com",
        );
        let expected_quality = assessor.assess(&input);
        let expected_content = input.content.clone();

        let results = merger.merge(vec![], vec![input], None, 0);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, expected_content);
        assert_eq!(results[0].sources, vec!["https://solo.example.com"]);
        assert_eq!(results[0].quality_score, expected_quality);
        assert_eq!(results[0].original_count, 1);
    }

    #[test]
    fn test_ranking_orders_by_quality() {
        let merger = FollowUpMerger::new(MergerConfig {
            enable_quality_filtering: false,
            similarity_threshold: 0.9,
            ..Default::default()
        });

        let strong = ResultRecord::new(
            long("Sodium-ion battery factories announced 40 GWh of capacity for 2026 deployment."),
            "https://strong.example.com",
            0.95,
            0.95,
        );
        let weak = ResultRecord::new(
            long("An unrelated observation about regional logistics practices."),
            "https://weak.example.com",
            0.1,
            0.1,
        );

        let results = merger.merge(vec![], vec![weak, strong], None, 0);

        assert_eq!(results.len(), 2);
        assert!(results[0].quality_score >= results[1].quality_score);
        assert!(results[0].content.contains("Sodium-ion"));
    }

    #[test]
    fn test_key_points_respect_cap() {
        let merger = FollowUpMerger::new(MergerConfig {
            max_key_points: 2,
            enable_quality_filtering: false,
            ..Default::default()
        });

        let content = "NASA launched 12 missions during 2025 overall. ESA followed with 8 \
                       launches of its own. JAXA completed 4 lunar flybys successfully. CNSA \
                       deployed 6 relay satellites afterwards.";
        let results = merger.merge(vec![], vec![record(content, "https://space.example.com")], None, 0);

        assert_eq!(results.len(), 1);
        assert!(results[0].key_points.len() <= 2);
    }

    #[test]
    fn test_performance_counters_accumulate() {
        let merger = FollowUpMerger::new(MergerConfig {
            enable_quality_filtering: false,
            ..Default::default()
        });

        let duplicate = long("Verbatim repeated statement about tidal energy output.");
        merger.merge(
            vec![],
            vec![
                record(&duplicate, "https://a.example.com"),
                record(&duplicate, "https://b.example.com"),
            ],
            None,
            0,
        );
        merger.merge(vec![], scenario_records(), None, 1);

        let perf = merger.performance();
        assert_eq!(perf.total_merges, 2);
        assert!(perf.deduplicated >= 1);
    }
}
