//! Search collaborator boundary.
//!
//! The engine consumes web search through the [`SearchProvider`] trait and
//! stays agnostic of the backend. [`DaedraSearchProvider`] searches
//! DuckDuckGo via the daedra crate; [`StaticSearchProvider`] serves canned
//! or scripted responses for tests and offline runs.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::types::{ResearchError, Result, ResultRecord};

/// Search collaborator interface: one query in, a batch of records out.
///
/// Implementations must be cheap to call concurrently; the iteration
/// controller may keep several queries in flight during one QUERYING phase.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &str;

    /// Execute one search query, returning at most `limit` records.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ResultRecord>>;
}

// ============= Daedra (DuckDuckGo) Provider =============

/// Web search provider powered by daedra.
#[derive(Debug, Default)]
pub struct DaedraSearchProvider;

impl DaedraSearchProvider {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchProvider for DaedraSearchProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ResultRecord>> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: limit,
                ..Default::default()
            }),
        };

        match daedra::tools::search::perform_search(&search_args).await {
            Ok(response) => {
                let records: Vec<ResultRecord> = response
                    .data
                    .iter()
                    .take(limit)
                    .enumerate()
                    .map(|(rank, r)| {
                        let content = if r.description.is_empty() {
                            r.title.clone()
                        } else {
                            format!("{}. {}", r.title, r.description)
                        };
                        // Earlier ranks get more confidence; relevance comes
                        // from query-term overlap.
                        let confidence = (0.9 - 0.05 * rank as f32).max(0.3);
                        let relevance = query_relevance(query, &content);
                        ResultRecord::new(content, r.url.clone(), confidence, relevance)
                    })
                    .collect();

                debug!(query, count = records.len(), "web search returned");
                Ok(records)
            }
            Err(e) => Err(ResearchError::CollaboratorFailure(format!(
                "Search failed: {}",
                e
            ))),
        }
    }
}

/// Fraction of query terms present in the content, floored for recall.
fn query_relevance(query: &str, content: &str) -> f32 {
    let content_lower = content.to_lowercase();
    let terms: Vec<String> = query
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .map(|w| w.to_lowercase())
        .collect();
    if terms.is_empty() {
        return 0.7;
    }

    let hits = terms
        .iter()
        .filter(|t| content_lower.contains(t.as_str()))
        .count();
    (hits as f32 / terms.len() as f32 + 0.3).min(1.0)
}

// ============= Static Provider =============

/// In-memory provider for tests and offline sessions.
///
/// Serves either a fixed record set for every query, or a scripted sequence
/// of per-query responses (including failures) that is consumed in order.
pub struct StaticSearchProvider {
    fixed: Vec<ResultRecord>,
    script: Mutex<VecDeque<Result<Vec<ResultRecord>>>>,
}

impl StaticSearchProvider {
    /// A provider that returns nothing.
    pub fn empty() -> Self {
        Self::with_records(Vec::new())
    }

    /// A provider that answers every query with the same records.
    pub fn with_records(records: Vec<ResultRecord>) -> Self {
        Self {
            fixed: records,
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// A provider that consumes `responses` one query at a time, then falls
    /// back to empty answers.
    pub fn with_script(responses: Vec<Result<Vec<ResultRecord>>>) -> Self {
        Self {
            fixed: Vec::new(),
            script: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<ResultRecord>> {
        if let Some(next) = self.script.lock().pop_front() {
            return next.map(|mut records| {
                records.truncate(limit);
                records
            });
        }

        let mut records = self.fixed.clone();
        records.truncate(limit);
        Ok(records)
    }
}
