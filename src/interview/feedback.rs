use log::{info, error};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;
use std::sync::Arc;

use crate::generative::TextGenerator;
use super::{EmotionScores, PauseAnalytics};

pub const FALLBACK_FEEDBACK: &str =
    "Could not generate detailed feedback at this time. Please try again later.";

/// Everything the feedback prompt is built from
#[derive(Debug, Clone, Copy)]
pub struct FeedbackInput<'a> {
    pub transcript: &'a str,
    pub sentiment_score: f64,
    pub emotion_scores: &'a EmotionScores,
    pub pause_analytics: Option<&'a PauseAnalytics>,
    pub interview_score: f64,
}

/// Single-line JSON with `", "` and `": "` separators, e.g. `{"joy": 0.5, "fear": 0.1}`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

fn to_spaced_json<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer).ok()?;
    String::from_utf8(buf).ok()
}

pub fn build_feedback_prompt(input: &FeedbackInput<'_>) -> String {
    let emotions_json = to_spaced_json(input.emotion_scores).unwrap_or_else(|| "{}".to_string());
    let pauses_json = input
        .pause_analytics
        .and_then(to_spaced_json)
        .unwrap_or_else(|| "{}".to_string());

    format!(
        "Analyze the following interview transcript and provide detailed feedback based on the provided analysis data.

Transcript: {}

Analysis Data:
- Overall Interview Score (out of 1): {:.2}
- Sentiment Score (typically -1 to 1): {:.2}
- Emotion Scores: {}
- Pause Analytics: {}

Provide constructive feedback covering:
1.  Overall performance based on the interview score.
2.  Analysis of sentiment and emotional expression, suggesting areas for improvement if needed.
3.  Feedback on pauses, including frequency and duration, with tips for better pacing.
4.  Suggestions for improving clarity, confidence, and overall communication based on the transcript and analysis.
5.  Format the feedback as a well-structured paragraph or bullet points for easy reading.
",
        input.transcript,
        input.interview_score,
        input.sentiment_score,
        emotions_json,
        pauses_json,
    )
}

/// Produces narrative feedback for an analysis. Never fails: any generator
/// error is logged and replaced by [`FALLBACK_FEEDBACK`].
#[derive(Clone)]
pub struct FeedbackGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl FeedbackGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate_feedback(&self, input: &FeedbackInput<'_>) -> String {
        let prompt = build_feedback_prompt(input);

        match self.generator.generate(&prompt).await {
            Ok(feedback) => {
                info!("✅ Generated feedback with {} ({} characters)", self.generator.name(), feedback.len());
                feedback
            }
            Err(e) => {
                error!("Error generating feedback with {}: {}", self.generator.name(), e);
                FALLBACK_FEEDBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct RecordingGenerator {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        fn name(&self) -> String {
            "recording".to_string()
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            self.reply.clone().ok_or_else(|| anyhow::anyhow!("quota exceeded"))
        }
    }

    fn sample_emotions() -> EmotionScores {
        [("joy".to_string(), 0.5), ("neutral".to_string(), 0.25)].into_iter().collect()
    }

    #[test]
    fn test_prompt_contents() {
        let emotions = sample_emotions();
        let pauses = PauseAnalytics { total_pauses: 2, avg_pause: 1.25, pauses: vec![1.0, 1.5] };
        let prompt = build_feedback_prompt(&FeedbackInput {
            transcript: "I led the migration to Rust.",
            sentiment_score: 0.91234,
            emotion_scores: &emotions,
            pause_analytics: Some(&pauses),
            interview_score: 0.7,
        });

        assert!(prompt.contains("Transcript: I led the migration to Rust."));
        assert!(prompt.contains("Overall Interview Score (out of 1): 0.70"));
        assert!(prompt.contains("Sentiment Score (typically -1 to 1): 0.91"));
        assert!(prompt.contains(r#"Emotion Scores: {"joy": 0.5, "neutral": 0.25}"#));
        assert!(prompt.contains(r#"Pause Analytics: {"total_pauses": 2, "avg_pause": 1.25, "pauses": [1.0, 1.5]}"#));
        for section in ["1.  Overall performance", "2.  Analysis of sentiment", "3.  Feedback on pauses", "4.  Suggestions", "5.  Format"] {
            assert!(prompt.contains(section), "missing section {}", section);
        }
    }

    #[test]
    fn test_prompt_without_pauses() {
        let emotions = EmotionScores::new();
        let prompt = build_feedback_prompt(&FeedbackInput {
            transcript: "",
            sentiment_score: 0.0,
            emotion_scores: &emotions,
            pause_analytics: None,
            interview_score: 0.0,
        });
        assert!(prompt.contains("Emotion Scores: {}"));
        assert!(prompt.contains("Pause Analytics: {}"));
    }

    #[test]
    fn test_spaced_json_matches_python_dumps() {
        let pauses = PauseAnalytics::default();
        assert_eq!(
            to_spaced_json(&pauses).unwrap(),
            r#"{"total_pauses": 0, "avg_pause": 0.0, "pauses": []}"#
        );
        assert_eq!(to_spaced_json(&EmotionScores::new()).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_generated_text_returned_verbatim() {
        let generator = Arc::new(RecordingGenerator {
            reply: Some("  Great pacing.\n".to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        let feedback = FeedbackGenerator::new(generator.clone());
        let emotions = sample_emotions();

        let text = feedback
            .generate_feedback(&FeedbackInput {
                transcript: "hello",
                sentiment_score: 0.5,
                emotion_scores: &emotions,
                pause_analytics: None,
                interview_score: 0.4,
            })
            .await;

        assert_eq!(text, "  Great pacing.\n");
        assert_eq!(generator.prompts.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_returns_fallback() {
        let generator = Arc::new(RecordingGenerator { reply: None, prompts: Mutex::new(Vec::new()) });
        let feedback = FeedbackGenerator::new(generator);
        let emotions = EmotionScores::new();

        let text = feedback
            .generate_feedback(&FeedbackInput {
                transcript: "hello",
                sentiment_score: 0.0,
                emotion_scores: &emotions,
                pause_analytics: None,
                interview_score: 0.0,
            })
            .await;

        assert_eq!(text, FALLBACK_FEEDBACK);
    }
}
