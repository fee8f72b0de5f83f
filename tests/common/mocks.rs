//! Mock collaborators for testing.
//!
//! The engine's search side is covered by `iris::StaticSearchProvider`
//! (fixed or scripted responses); this module adds the gap-analysis mocks
//! and a provider that never answers in time.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use iris::{GapAnalyzer, KnowledgeGap, MergedResult, ResearchError, ResultRecord, SearchProvider};

/// Gap analyzer that reports the same unresolved gaps on every call.
///
/// Drives the iteration loop until a cap binds, which is exactly what the
/// cap tests need.
pub struct InsistentGapAnalyzer {
    gaps: Vec<KnowledgeGap>,
    calls: Arc<AtomicUsize>,
}

impl InsistentGapAnalyzer {
    pub fn new(descriptions: &[&str]) -> Self {
        Self {
            gaps: descriptions
                .iter()
                .enumerate()
                .map(|(i, d)| KnowledgeGap::new(*d, 0.9 - 0.1 * i as f32))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl GapAnalyzer for InsistentGapAnalyzer {
    fn name(&self) -> &str {
        "insistent"
    }

    async fn analyze(
        &self,
        _topic: &str,
        _results: &[MergedResult],
    ) -> Result<Vec<KnowledgeGap>, ResearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.gaps.clone())
    }
}

/// Gap analyzer that consumes scripted per-call responses, then reports no
/// gaps.
pub struct ScriptedGapAnalyzer {
    script: Mutex<VecDeque<Result<Vec<KnowledgeGap>, ResearchError>>>,
}

impl ScriptedGapAnalyzer {
    pub fn new(responses: Vec<Result<Vec<KnowledgeGap>, ResearchError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl GapAnalyzer for ScriptedGapAnalyzer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(
        &self,
        _topic: &str,
        _results: &[MergedResult],
    ) -> Result<Vec<KnowledgeGap>, ResearchError> {
        match self.script.lock().pop_front() {
            Some(response) => response,
            None => Ok(Vec::new()),
        }
    }
}

/// Search provider that stalls longer than any configured query timeout.
pub struct StallingSearchProvider {
    delay: Duration,
}

impl StallingSearchProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl SearchProvider for StallingSearchProvider {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn search(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<ResultRecord>, ResearchError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![ResultRecord::new(
            "arrived too late to matter for the session outcome entirely",
            "https://slow.example.com",
            0.9,
            0.9,
        )])
    }
}
