use anyhow::Result;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::interview::TranscriptSegment;

/// Full transcript plus its time-ordered segments
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}
