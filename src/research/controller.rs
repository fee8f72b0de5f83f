//! The iteration controller: evaluate → query → merge until sufficient.
//!
//! Phases run sequentially per session. Follow-up queries inside one
//! QUERYING phase may run concurrently; their results are collected
//! order-insensitively before MERGING. A failed or timed-out query
//! contributes zero records and never aborts the session - only an invalid
//! configuration or cancellation ends a session before natural termination.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{ConfigManager, IrisConfig};
use crate::merger::{FollowUpMerger, MergeStatistics};
use crate::reflection::GapAnalyzer;
use crate::research::sufficiency::SufficiencyEvaluator;
use crate::search::SearchProvider;
use crate::types::{MergedResult, Result, ResultRecord, SufficiencyVerdict};

// ============= Session State =============

/// Controller phases. Transitions are sequential per session:
/// `Init → Evaluating → Querying → Merging → (Evaluating | Terminated)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Counters initialized, initial batch not yet merged.
    Init,
    /// Invoking the gap analyzer and sufficiency evaluator.
    Evaluating,
    /// Issuing follow-up queries to the search collaborator.
    Querying,
    /// Folding new records into the working result set.
    Merging,
    /// Final result set emitted.
    Terminated,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Evaluating => "evaluating",
            Self::Querying => "querying",
            Self::Merging => "merging",
            Self::Terminated => "terminated",
        };
        write!(f, "{}", name)
    }
}

/// Session-scoped counters, bounded by the iteration configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IterationState {
    /// Completed query/merge cycles.
    pub iteration: u32,
    /// Follow-up queries issued.
    pub queries_issued: u32,
    /// Gap-analysis calls made.
    pub reflections: u32,
}

/// Everything a session emits on termination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Session identity.
    pub session_id: Uuid,
    /// The research topic.
    pub topic: String,
    /// Final merged results, best first.
    pub results: Vec<MergedResult>,
    /// The verdict that terminated the session (or the last one computed
    /// before a cap or cancellation bound).
    pub verdict: SufficiencyVerdict,
    /// Final counter values.
    pub state: IterationState,
    /// Summary of the final result set.
    pub statistics: MergeStatistics,
    /// Wall-clock session duration.
    pub duration_ms: u64,
}

// ============= Iteration Controller =============

/// Drives one research session through the phase machine.
pub struct IterationController {
    config_manager: Arc<ConfigManager>,
    search: Arc<dyn SearchProvider>,
    gap_analyzer: Arc<dyn GapAnalyzer>,
    state: IterationState,
    cancel: CancellationToken,
}

impl IterationController {
    /// Create a controller.
    ///
    /// The active configuration is validated here, so a bad configuration
    /// fails before any iteration begins.
    pub fn new(
        config_manager: Arc<ConfigManager>,
        search: Arc<dyn SearchProvider>,
        gap_analyzer: Arc<dyn GapAnalyzer>,
    ) -> Result<Self> {
        config_manager.config().validate()?;

        Ok(Self {
            config_manager,
            search,
            gap_analyzer,
            state: IterationState::default(),
            cancel: CancellationToken::new(),
        })
    }

    /// Token for cancelling the session from outside.
    ///
    /// Cancellation is observed between phases - before each QUERYING and
    /// MERGING phase - and terminates the session with whatever results
    /// exist.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current counter values.
    pub fn state(&self) -> IterationState {
        self.state
    }

    /// Run a research session over `topic`, seeded with the initial batch of
    /// records from the search collaborator.
    pub async fn run(
        &mut self,
        topic: &str,
        initial: Vec<ResultRecord>,
    ) -> Result<SessionOutcome> {
        let started = std::time::Instant::now();
        let session_id = Uuid::new_v4();

        let mut config = self.config_manager.config();
        config.validate()?;

        if config.iteration.reset_counter_on_new_task {
            self.state = IterationState::default();
        }

        info!(
            %session_id,
            topic,
            preset = %config.preset,
            phase = %Phase::Init,
            initial_records = initial.len(),
            "research session started"
        );

        let mut merger = FollowUpMerger::new(config.merger.clone());
        let mut results = merger.merge(Vec::new(), initial, Some(topic), self.state.iteration);
        let mut verdict;

        loop {
            // A preset switched at runtime takes effect here, at the
            // iteration boundary - never mid-merge.
            if config.enable_runtime_switching {
                let fresh = self.config_manager.config();
                if !Arc::ptr_eq(&fresh, &config) && fresh.validate().is_ok() {
                    info!(preset = %fresh.preset, "applying configuration switch at iteration boundary");
                    config = fresh;
                    merger = FollowUpMerger::new(config.merger.clone());
                }
            }
            let evaluator = SufficiencyEvaluator::new(&config.iteration);

            let gaps = match self.gap_analyzer.analyze(topic, &results).await {
                Ok(gaps) => gaps,
                Err(e) => {
                    warn!(
                        analyzer = self.gap_analyzer.name(),
                        error = %e,
                        "gap analysis failed, treating as no outstanding gaps"
                    );
                    Vec::new()
                }
            };
            self.state.reflections += 1;

            verdict = evaluator.evaluate(&results, &gaps);
            debug!(
                phase = %Phase::Evaluating,
                sufficient = verdict.sufficient,
                coverage = verdict.coverage,
                iteration = self.state.iteration,
                "sufficiency verdict"
            );

            if verdict.sufficient {
                info!("accumulated knowledge sufficient, terminating");
                break;
            }
            if self.state.iteration >= config.iteration.max_follow_up_iterations {
                info!(
                    iterations = self.state.iteration,
                    "follow-up iteration cap reached, terminating"
                );
                break;
            }
            if self.state.queries_issued >= config.iteration.max_total_reflections {
                info!(
                    queries = self.state.queries_issued,
                    "total query cap reached, terminating"
                );
                break;
            }
            if self.cancel.is_cancelled() {
                info!("session cancelled before querying, terminating");
                break;
            }

            let remaining = config
                .iteration
                .max_total_reflections
                .saturating_sub(self.state.queries_issued)
                as usize;
            let budget = (config.iteration.max_queries_per_iteration as usize).min(remaining);
            let queries: Vec<String> = verdict
                .priority_areas
                .iter()
                .take(budget)
                .cloned()
                .collect();

            debug!(
                phase = %Phase::Querying,
                queries = queries.len(),
                parallel = config.iteration.enable_parallel_follow_up,
                "issuing follow-up queries"
            );
            self.state.queries_issued += queries.len() as u32;

            let next_iteration = self.state.iteration + 1;
            let new_records: Vec<ResultRecord> = if config.iteration.enable_parallel_follow_up {
                self.execute_parallel(&queries, &config).await
            } else {
                self.execute_sequential(&queries, &config).await
            }
            .into_iter()
            .map(|r| r.with_iteration(next_iteration))
            .collect();

            if self.cancel.is_cancelled() {
                info!("session cancelled before merging, terminating");
                break;
            }

            debug!(
                phase = %Phase::Merging,
                new_records = new_records.len(),
                "merging follow-up records"
            );
            results = merger.merge(results, new_records, Some(topic), next_iteration);
            self.state.iteration = next_iteration;
        }

        let statistics = FollowUpMerger::statistics(&results);
        info!(
            %session_id,
            phase = %Phase::Terminated,
            results = results.len(),
            iterations = self.state.iteration,
            queries = self.state.queries_issued,
            cache_hit_rate = merger.performance().cache.hit_rate(),
            "research session terminated"
        );

        Ok(SessionOutcome {
            session_id,
            topic: topic.to_string(),
            results,
            verdict,
            state: self.state,
            statistics,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Issue follow-up queries concurrently; results collected
    /// order-insensitively.
    async fn execute_parallel(&self, queries: &[String], config: &IrisConfig) -> Vec<ResultRecord> {
        let mut set = JoinSet::new();

        for query in queries {
            let provider = Arc::clone(&self.search);
            let query = query.clone();
            let timeout_secs = config.iteration.query_timeout_seconds;
            let limit = config.iteration.max_search_results;

            set.spawn(async move { fetch_one(provider, query, timeout_secs, limit).await });
        }

        let mut records = Vec::new();
        while let Some(res) = set.join_next().await {
            match res {
                Ok(batch) => records.extend(batch),
                Err(e) => warn!(error = %e, "follow-up query task failed"),
            }
        }
        records
    }

    /// Issue follow-up queries one at a time, pacing between requests.
    async fn execute_sequential(
        &self,
        queries: &[String],
        config: &IrisConfig,
    ) -> Vec<ResultRecord> {
        let delay = config.iteration.follow_up_delay_seconds;
        let mut records = Vec::new();

        for (i, query) in queries.iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }
            if i > 0 && delay > 0.0 {
                tokio::time::sleep(Duration::from_secs_f64(delay)).await;
            }
            records.extend(
                fetch_one(
                    Arc::clone(&self.search),
                    query.clone(),
                    config.iteration.query_timeout_seconds,
                    config.iteration.max_search_results,
                )
                .await,
            );
        }
        records
    }
}

/// One collaborator call with the timeout/failure recovery of the phase
/// machine: errors and timeouts contribute zero records.
async fn fetch_one(
    provider: Arc<dyn SearchProvider>,
    query: String,
    timeout_secs: u64,
    limit: usize,
) -> Vec<ResultRecord> {
    match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        provider.search(&query, limit),
    )
    .await
    {
        Err(_) => {
            let err = crate::types::ResearchError::CollaboratorTimeout {
                seconds: timeout_secs,
                context: query.clone(),
            };
            warn!(error = %err, "follow-up query recovered as empty result");
            Vec::new()
        }
        Ok(Err(e)) => {
            warn!(%query, error = %e, "follow-up query failed, contributing no records");
            Vec::new()
        }
        Ok(Ok(records)) => {
            debug!(%query, count = records.len(), "follow-up query returned");
            records
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Evaluating.to_string(), "evaluating");
        assert_eq!(Phase::Terminated.to_string(), "terminated");
    }

    #[test]
    fn test_iteration_state_default() {
        let state = IterationState::default();
        assert_eq!(state.iteration, 0);
        assert_eq!(state.queries_issued, 0);
        assert_eq!(state.reflections, 0);
    }
}
