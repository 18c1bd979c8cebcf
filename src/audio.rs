use async_trait::async_trait;
use log::{info, error};
use std::path::Path;
use tokio::process::Command;

use crate::error::{AnalysisError, Result};

/// Pulls the audio track out of a video file
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Write a mono 16 kHz PCM WAV of `video_path` to `audio_path`.
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;
}

pub struct FfmpegExtractor {
    ffmpeg_path: String,
}

impl FfmpegExtractor {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self { ffmpeg_path: ffmpeg_path.into() }
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {:?}", video_path);

        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(video_path)
            .args(["-vn", "-acodec", "pcm_s16le", "-ac", "1", "-ar", "16000", "-f", "wav"])
            .arg(audio_path)
            .output()
            .await
            .map_err(|e| AnalysisError::AudioExtraction(format!("failed to run {}: {}", self.ffmpeg_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            error!("ffmpeg exited with {}: {}", output.status, stderr.lines().last().unwrap_or(""));
            return Err(classify_ffmpeg_failure(stderr));
        }

        if !tokio::fs::try_exists(audio_path).await.unwrap_or(false) {
            return Err(AnalysisError::NoAudioStream);
        }

        Ok(())
    }
}

fn classify_ffmpeg_failure(stderr: String) -> AnalysisError {
    // "Output file #0 does not contain any stream" / "...: Invalid argument"
    if stderr.contains("does not contain any stream") || stderr.contains("Invalid argument") {
        AnalysisError::NoAudioStream
    } else {
        AnalysisError::AudioExtraction(stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_stream_is_no_audio() {
        let err = classify_ffmpeg_failure("Output file #0 does not contain any stream".to_string());
        assert!(matches!(err, AnalysisError::NoAudioStream));

        let err = classify_ffmpeg_failure("temp.wav: Invalid argument".to_string());
        assert!(matches!(err, AnalysisError::NoAudioStream));
    }

    #[test]
    fn test_other_failures_keep_stderr() {
        let err = classify_ffmpeg_failure("moov atom not found".to_string());
        match err {
            AnalysisError::AudioExtraction(msg) => assert_eq!(msg, "moov atom not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_extraction_error() {
        let extractor = FfmpegExtractor::new("/nonexistent/ffmpeg-binary");
        let err = extractor
            .extract_audio(Path::new("in.mp4"), Path::new("out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::AudioExtraction(_)));
    }
}
