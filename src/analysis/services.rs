use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::analysis::dto::{AnalysisResult, HistorySummary, Safety};
use crate::storage::{load_json, save_json, KeyValueStore, ANALYSIS_HISTORY_KEY};

pub const HISTORY_LIMIT: usize = 20;

/// Current result plus a most-recent-first history capped at [`HISTORY_LIMIT`].
/// Only the history is persisted.
pub struct AnalysisStore {
    store: Arc<dyn KeyValueStore>,
    current: Option<AnalysisResult>,
    history: Vec<AnalysisResult>,
    analyzing: bool,
}

impl AnalysisStore {
    pub(crate) fn empty(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: None,
            history: Vec::new(),
            analyzing: false,
        }
    }

    pub async fn load(store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let history = load_json::<Vec<AnalysisResult>>(store.as_ref(), ANALYSIS_HISTORY_KEY)
            .await?
            .unwrap_or_default();
        debug!(entries = history.len(), "analysis history loaded");
        Ok(Self {
            history,
            ..Self::empty(store)
        })
    }

    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, result: AnalysisResult) {
        self.current = Some(result);
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn set_analyzing(&mut self, value: bool) {
        self.analyzing = value;
    }

    pub fn history(&self) -> &[AnalysisResult] {
        &self.history
    }

    pub fn find(&self, id: &str) -> Option<&AnalysisResult> {
        self.history.iter().find(|a| a.id == id)
    }

    /// Prepends and truncates. Entries are never deduplicated or re-sorted.
    #[instrument(skip(self, result), fields(id = %result.id, food = %result.food_name))]
    pub async fn add_to_history(&mut self, result: AnalysisResult) -> anyhow::Result<()> {
        let mut updated = Vec::with_capacity(HISTORY_LIMIT);
        updated.push(result);
        updated.extend(self.history.iter().take(HISTORY_LIMIT - 1).cloned());

        save_json(self.store.as_ref(), ANALYSIS_HISTORY_KEY, &updated).await?;
        info!(entries = updated.len(), "analysis added to history");
        self.history = updated;
        Ok(())
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            total_analyses: self.history.len(),
            total_safe: self.history.iter().map(|a| a.count(Safety::Safe)).sum(),
            total_unsafe: self.history.iter().map(|a| a.count(Safety::Unsafe)).sum(),
        }
    }
}

#[cfg(test)]
mod analysis_store_tests {
    use super::*;
    use crate::analysis::mock::generate_mock_analysis;
    use crate::storage::MemoryStore;

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn history_is_capped_and_most_recent_first() {
        let store = memory();
        let mut analyses = AnalysisStore::load(store.clone()).await.unwrap();
        let mut last_id = String::new();
        for i in 0..45 {
            let result = generate_mock_analysis(&format!("item-{i}"), "img");
            last_id = result.id.clone();
            analyses.add_to_history(result).await.unwrap();
            assert!(analyses.history().len() <= HISTORY_LIMIT);
            assert_eq!(analyses.history()[0].id, last_id);
        }
        assert_eq!(analyses.history().len(), HISTORY_LIMIT);
        assert_eq!(analyses.history()[0].food_name, "item-44");
        assert_eq!(analyses.history()[19].food_name, "item-25");

        let reloaded = AnalysisStore::load(store).await.unwrap();
        assert_eq!(reloaded.history().len(), HISTORY_LIMIT);
        assert_eq!(reloaded.history()[0].id, last_id);
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let mut analyses = AnalysisStore::load(memory()).await.unwrap();
        let result = generate_mock_analysis("Apple", "img");
        analyses.add_to_history(result.clone()).await.unwrap();
        analyses.add_to_history(result.clone()).await.unwrap();
        assert_eq!(analyses.history().len(), 2);
        assert_eq!(analyses.history()[0], analyses.history()[1]);
    }

    #[tokio::test]
    async fn current_is_independent_of_history() {
        let store = memory();
        let mut analyses = AnalysisStore::load(store.clone()).await.unwrap();
        assert!(analyses.current().is_none());

        let result = generate_mock_analysis("Apple", "img");
        analyses.set_current(result.clone());
        assert_eq!(analyses.current(), Some(&result));
        assert!(analyses.history().is_empty());

        analyses.clear_current();
        assert!(analyses.current().is_none());

        analyses.set_current(result.clone());
        analyses.add_to_history(result.clone()).await.unwrap();
        let reloaded = AnalysisStore::load(store).await.unwrap();
        assert!(reloaded.current().is_none());
        assert!(reloaded.find(&result.id).is_some());
        assert!(reloaded.find("missing").is_none());
    }

    #[tokio::test]
    async fn summary_counts_across_history() {
        let mut analyses = AnalysisStore::load(memory()).await.unwrap();
        assert_eq!(analyses.summary(), HistorySummary::default());
        for name in ["a", "b", "c"] {
            analyses
                .add_to_history(generate_mock_analysis(name, "img"))
                .await
                .unwrap();
        }
        let summary = analyses.summary();
        assert_eq!(summary.total_analyses, 3);
        assert_eq!(summary.total_safe, 6);
        assert_eq!(summary.total_unsafe, 3);
    }

    #[tokio::test]
    async fn malformed_history_is_reported() {
        let store = memory();
        store.set(ANALYSIS_HISTORY_KEY, "{}").await.unwrap();
        assert!(AnalysisStore::load(store).await.is_err());
    }
}
