use dashmap::DashMap;

use crate::AnalysisResults;

/// Fetched results keyed by task id. Unbounded and process-lifetime by
/// design: a session only ever holds a handful of tasks, and the map is
/// cleared on full reset.
#[derive(Debug, Default)]
pub struct ResultsCache {
    entries: DashMap<String, AnalysisResults>,
}

impl ResultsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, task_id: &str) -> Option<AnalysisResults> {
        self.entries.get(task_id).map(|entry| entry.clone())
    }

    pub fn insert(&self, results: AnalysisResults) {
        self.entries.insert(results.task_id.clone(), results);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
