use thiserror::Error;

use crate::database::DatabaseError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No audio stream found in the uploaded video. Please upload a video with audio.")]
    NoAudioStream,
    #[error("Error extracting audio: {0}")]
    AudioExtraction(String),
    #[error("Transcription failed: {0}")]
    Transcription(String),
    #[error("Query parameter is required")]
    EmptyQuery,
    #[error("Text generation failed: {0}")]
    Generation(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
