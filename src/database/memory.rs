use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{AnalysisStore, DatabaseError, Result};
use super::models::InterviewAnalysis;

/// Process-local store, used when no database is configured and in tests
#[derive(Debug, Default)]
pub struct InMemoryAnalysisStore {
    analyses: Mutex<IndexMap<Uuid, InterviewAnalysis>>,
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.analyses.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.lock().is_empty()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn save(&self, analysis: &InterviewAnalysis) -> Result<()> {
        self.analyses.lock().insert(analysis.id, analysis.clone());
        Ok(())
    }

    async fn get(&self, user_id: Uuid, analysis_id: Uuid) -> Result<InterviewAnalysis> {
        self.analyses
            .lock()
            .get(&analysis_id)
            .filter(|a| a.user_id == user_id)
            .cloned()
            .ok_or_else(|| DatabaseError::AnalysisNotFound(analysis_id.to_string()))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<InterviewAnalysis>> {
        let mut analyses: Vec<InterviewAnalysis> = self
            .analyses
            .lock()
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(analyses)
    }
}
