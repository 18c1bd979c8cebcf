pub mod postgres;
pub mod models;
pub mod memory;

pub use postgres::PostgresAnalysisStore;
pub use models::{InterviewAnalysis, ProfileSummary, InterviewHistoryEntry};
pub use memory::InMemoryAnalysisStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Persistence for analysis records, one row per analyzed video
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert the record, or overwrite the stored one with the same id.
    async fn save(&self, analysis: &InterviewAnalysis) -> Result<()>;

    async fn get(&self, user_id: Uuid, analysis_id: Uuid) -> Result<InterviewAnalysis>;

    /// All analyses of one user, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<InterviewAnalysis>>;

    async fn profile_summary(&self, user_id: Uuid) -> Result<ProfileSummary> {
        let analyses = self.list_for_user(user_id).await?;
        Ok(ProfileSummary::from_analyses(&analyses))
    }
}
