//! Interview video analysis: transcript, sentiment, emotion and pause metrics,
//! a composite interview score, and generated feedback.

use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub mod audio;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod database;
pub mod deepgram;
pub mod error;
pub mod gemini;
pub mod generative;
pub mod interview;
pub mod openai;
pub mod transcription;

use config::AppConfig;
use database::{AnalysisStore, InMemoryAnalysisStore, InterviewAnalysis, PostgresAnalysisStore};
use interview::{AnalysisServices, InterviewAnalyzer};

/// Postgres when reachable, otherwise a process-local store.
pub async fn open_store(config: &AppConfig) -> Arc<dyn AnalysisStore> {
    match PostgresAnalysisStore::new(&config.database).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Database unavailable ({}), results will not be persisted", e);
            Arc::new(InMemoryAnalysisStore::new())
        }
    }
}

/// Load configuration, wire the services and analyze one video.
pub async fn run(video_path: &Path, candidate_name: &str, user_id: Uuid) -> anyhow::Result<InterviewAnalysis> {
    info!("Interview analyzer starting...");

    let config = AppConfig::load()?;
    config.log_status();

    let store = open_store(&config).await;
    let services = AnalysisServices::from_config(&config, store)?;
    let analyzer = InterviewAnalyzer::new(services);

    Ok(analyzer.analyze_video(user_id, candidate_name, video_path).await?)
}
