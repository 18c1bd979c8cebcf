use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::audio::{AudioExtractor, FfmpegExtractor};
use crate::classifier::{HuggingFaceClassifier, TextClassifier};
use crate::config::AppConfig;
use crate::database::{AnalysisStore, InterviewAnalysis};
use crate::deepgram::DeepgramTranscriber;
use crate::error::{AnalysisError, Result};
use crate::generative::{build_generator, TextGenerator};
use crate::transcription::Transcriber;
use super::{get_pause_analytics, EmotionScores, FeedbackGenerator, FeedbackInput};

/// External collaborators, constructed once and shared by every analysis
#[derive(Clone)]
pub struct AnalysisServices {
    pub audio: Arc<dyn AudioExtractor>,
    pub transcriber: Arc<dyn Transcriber>,
    pub classifier: Arc<dyn TextClassifier>,
    pub generator: Arc<dyn TextGenerator>,
    pub store: Arc<dyn AnalysisStore>,
}

impl AnalysisServices {
    pub fn from_config(config: &AppConfig, store: Arc<dyn AnalysisStore>) -> anyhow::Result<Self> {
        let deepgram_key = config
            .deepgram_api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("DEEPGRAM_API_KEY is not configured"))?;

        if config.huggingface_api_key.is_none() {
            warn!("HUGGINGFACE_API_KEY not set - anonymous Inference API requests are heavily rate limited");
        }

        let transcriber = DeepgramTranscriber::new(
            deepgram_key,
            config.deepgram_model.clone(),
            config.deepgram_language.clone(),
            config.request_timeout(),
        )
        .with_base_url(config.deepgram_base_url.clone());

        let classifier = HuggingFaceClassifier::new(
            config.huggingface_api_key.clone(),
            config.sentiment_model.clone(),
            config.emotion_model.clone(),
            config.classification_prefix_chars,
            config.request_timeout(),
        )
        .with_base_url(config.huggingface_base_url.clone());

        Ok(Self {
            audio: Arc::new(FfmpegExtractor::new(config.ffmpeg_path.clone())),
            transcriber: Arc::new(transcriber),
            classifier: Arc::new(classifier),
            generator: build_generator(config)?,
            store,
        })
    }
}

/// Runs the video -> transcript -> metrics -> score -> feedback pipeline
pub struct InterviewAnalyzer {
    services: AnalysisServices,
    feedback: FeedbackGenerator,
    work_dir: PathBuf,
}

impl InterviewAnalyzer {
    pub fn new(services: AnalysisServices) -> Self {
        let feedback = FeedbackGenerator::new(services.generator.clone());
        Self {
            services,
            feedback,
            work_dir: std::env::temp_dir(),
        }
    }

    /// Directory for the intermediate WAV files
    pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
        self.work_dir = work_dir;
        self
    }

    pub async fn analyze_video(
        &self,
        user_id: Uuid,
        candidate_name: &str,
        video_path: &Path,
    ) -> Result<InterviewAnalysis> {
        let audio_path = self.work_dir.join(format!("{}.wav", Uuid::new_v4()));

        let result = self.run_analysis(user_id, candidate_name, video_path, &audio_path).await;

        if let Err(e) = tokio::fs::remove_file(&audio_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove temporary audio {:?}: {}", audio_path, e);
            }
        }

        result
    }

    async fn run_analysis(
        &self,
        user_id: Uuid,
        candidate_name: &str,
        video_path: &Path,
        audio_path: &Path,
    ) -> Result<InterviewAnalysis> {
        info!("🎬 Analyzing interview video {:?} for {}", video_path, candidate_name);

        self.services.audio.extract_audio(video_path, audio_path).await?;

        let transcript = self
            .services
            .transcriber
            .transcribe(audio_path)
            .await
            .map_err(|e| AnalysisError::Transcription(e.to_string()))?;

        let (sentiment_score, emotion_scores) = self.analyze_text(&transcript.text).await;

        let pause_analytics = if transcript.segments.is_empty() {
            None
        } else {
            Some(get_pause_analytics(&transcript.segments))
        };

        let mut analysis = InterviewAnalysis::new(
            user_id,
            candidate_name.to_string(),
            video_path.display().to_string(),
            transcript.text,
            sentiment_score,
            emotion_scores,
            pause_analytics,
        );
        analysis.calculate_interview_score();
        self.services.store.save(&analysis).await?;

        let feedback = self
            .feedback
            .generate_feedback(&FeedbackInput {
                transcript: &analysis.transcript,
                sentiment_score: analysis.sentiment_score,
                emotion_scores: &analysis.emotion_scores,
                pause_analytics: analysis.pause_analytics.as_ref(),
                interview_score: analysis.interview_score,
            })
            .await;
        analysis.set_feedback(feedback);
        self.services.store.save(&analysis).await?;

        info!(
            "✅ Analysis {} complete - score {:.2}, sentiment {:.2}",
            analysis.id, analysis.interview_score, analysis.sentiment_score
        );
        Ok(analysis)
    }

    /// Sentiment score and emotions; a failed classification counts as neutral.
    async fn analyze_text(&self, transcript: &str) -> (f64, EmotionScores) {
        match self.services.classifier.classify(transcript).await {
            Ok(analysis) if analysis.sentiment.score.is_finite() => {
                (analysis.sentiment.score, analysis.emotions)
            }
            Ok(analysis) => {
                warn!("Ignoring non-finite sentiment score from classifier");
                (0.0, analysis.emotions)
            }
            Err(e) => {
                warn!("Sentiment analysis failed: {}", e);
                (0.0, EmotionScores::new())
            }
        }
    }
}
