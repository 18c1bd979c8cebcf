use async_trait::async_trait;
use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;
use log::{info, error};

use super::{AnalysisStore, DatabaseError, Result};
use super::models::InterviewAnalysis;
use crate::config::DatabaseConfig;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS interview_analyses (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        candidate_name TEXT NOT NULL,
        video_file TEXT NOT NULL,
        transcript TEXT NOT NULL,
        sentiment_score DOUBLE PRECISION NOT NULL DEFAULT 0,
        emotion_scores JSONB NOT NULL DEFAULT '{}'::jsonb,
        pause_analytics JSONB,
        feedback TEXT NOT NULL DEFAULT '',
        interview_score DOUBLE PRECISION NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_interview_analyses_user_created
        ON interview_analyses (user_id, created_at DESC);
"#;

const SELECT_COLUMNS: &str = "id, user_id, candidate_name, video_file, transcript, sentiment_score, \
     emotion_scores, pause_analytics, feedback, interview_score, created_at, updated_at";

#[derive(Debug)]
pub struct PostgresAnalysisStore {
    pool: Pool,
}

impl PostgresAnalysisStore {
    pub async fn new(db: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database: {}@{}:{}/{}", db.user, db.host, db.port, db.name);

        let mut cfg = Config::new();
        cfg.url = Some(db.url());
        cfg.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| DatabaseError::ConnectionFailed(format!("Pool creation failed: {}", e)))?;

        let store = Self { pool };
        store.ensure_schema().await?;

        info!("Database connection established successfully");
        Ok(store)
    }

    async fn client(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.client().await?;
        client.batch_execute(CREATE_TABLE).await.map_err(|e| {
            error!("Failed to create interview_analyses table: {}", e);
            DatabaseError::QueryFailed(format!("Schema setup failed: {}", e))
        })
    }
}

fn row_to_analysis(row: &Row) -> Result<InterviewAnalysis> {
    let emotion_scores: serde_json::Value = row.get(6);
    let pause_analytics: Option<serde_json::Value> = row.get(7);

    Ok(InterviewAnalysis {
        id: row.get(0),
        user_id: row.get(1),
        candidate_name: row.get(2),
        video_file: row.get(3),
        transcript: row.get(4),
        sentiment_score: row.get(5),
        emotion_scores: serde_json::from_value(emotion_scores)
            .map_err(|e| DatabaseError::InvalidData(format!("emotion_scores: {}", e)))?,
        pause_analytics: pause_analytics
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| DatabaseError::InvalidData(format!("pause_analytics: {}", e)))?,
        feedback: row.get(8),
        interview_score: row.get(9),
        created_at: row.get(10),
        updated_at: row.get(11),
    })
}

#[async_trait]
impl AnalysisStore for PostgresAnalysisStore {
    async fn save(&self, analysis: &InterviewAnalysis) -> Result<()> {
        let client = self.client().await?;

        let emotion_scores = serde_json::to_value(&analysis.emotion_scores)
            .map_err(|e| DatabaseError::InvalidData(e.to_string()))?;
        let pause_analytics = analysis
            .pause_analytics
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DatabaseError::InvalidData(e.to_string()))?;

        client
            .execute(
                r#"
                INSERT INTO interview_analyses
                (id, user_id, candidate_name, video_file, transcript, sentiment_score,
                 emotion_scores, pause_analytics, feedback, interview_score, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (id) DO UPDATE SET
                    transcript = EXCLUDED.transcript,
                    sentiment_score = EXCLUDED.sentiment_score,
                    emotion_scores = EXCLUDED.emotion_scores,
                    pause_analytics = EXCLUDED.pause_analytics,
                    feedback = EXCLUDED.feedback,
                    interview_score = EXCLUDED.interview_score,
                    updated_at = EXCLUDED.updated_at
                "#,
                &[
                    &analysis.id,
                    &analysis.user_id,
                    &analysis.candidate_name,
                    &analysis.video_file,
                    &analysis.transcript,
                    &analysis.sentiment_score,
                    &emotion_scores,
                    &pause_analytics,
                    &analysis.feedback,
                    &analysis.interview_score,
                    &analysis.created_at,
                    &analysis.updated_at,
                ],
            )
            .await
            .map_err(|e| {
                error!("Failed to save analysis {}: {}", analysis.id, e);
                DatabaseError::QueryFailed(format!("Failed to save analysis: {}", e))
            })?;

        info!("Saved analysis {} (score {:.2})", analysis.id, analysis.interview_score);
        Ok(())
    }

    async fn get(&self, user_id: Uuid, analysis_id: Uuid) -> Result<InterviewAnalysis> {
        let client = self.client().await?;

        let sql = format!("SELECT {} FROM interview_analyses WHERE id = $1 AND user_id = $2", SELECT_COLUMNS);
        let row = client
            .query_opt(sql.as_str(), &[&analysis_id, &user_id])
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to fetch analysis: {}", e)))?
            .ok_or_else(|| DatabaseError::AnalysisNotFound(analysis_id.to_string()))?;

        row_to_analysis(&row)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<InterviewAnalysis>> {
        let client = self.client().await?;

        let sql = format!(
            "SELECT {} FROM interview_analyses WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        );
        let rows = client
            .query(sql.as_str(), &[&user_id])
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to list analyses: {}", e)))?;

        rows.iter().map(row_to_analysis).collect()
    }
}
