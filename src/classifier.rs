use anyhow::Result;
use async_trait::async_trait;
use log::{info, error, debug};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::interview::EmotionScores;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: String,
    pub score: f64,
}

/// Sentiment plus per-label emotion probabilities for one piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnalysis {
    pub sentiment: SentimentResult,
    pub emotions: EmotionScores,
}

#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<TextAnalysis>;
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Hugging Face Inference API: one sentiment model, one emotion model
#[derive(Clone)]
pub struct HuggingFaceClassifier {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    sentiment_model: String,
    emotion_model: String,
    prefix_chars: usize,
}

impl HuggingFaceClassifier {
    pub fn new(
        api_key: Option<String>,
        sentiment_model: String,
        emotion_model: String,
        prefix_chars: usize,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            sentiment_model,
            emotion_model,
            prefix_chars,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn infer(&self, model: &str, text: &str) -> Result<Vec<LabelScore>> {
        let mut request = self
            .client
            .post(format!("{}/{}", self.base_url, model))
            .json(&serde_json::json!({
                "inputs": text,
                "options": {"wait_for_model": true}
            }));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Hugging Face API error for {} ({}): {}", model, status, error_text);
            return Err(anyhow::anyhow!("Hugging Face API error for {} ({}): {}", model, status, error_text));
        }

        let data: Value = response.json().await?;
        debug!("{} response: {}", model, data);
        parse_label_scores(data)
    }
}

#[async_trait]
impl TextClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<TextAnalysis> {
        let prefix = truncate_chars(text, self.prefix_chars);

        let (sentiment_scores, emotion_scores) = futures::try_join!(
            self.infer(&self.sentiment_model, prefix),
            self.infer(&self.emotion_model, prefix),
        )?;

        let sentiment = sentiment_scores
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|top| SentimentResult { label: top.label, score: top.score })
            .ok_or_else(|| anyhow::anyhow!("Sentiment model returned no labels"))?;

        let emotions: EmotionScores = emotion_scores
            .into_iter()
            .map(|e| (e.label, e.score))
            .collect();

        info!("Sentiment {} ({:.3}), {} emotion labels", sentiment.label, sentiment.score, emotions.len());
        Ok(TextAnalysis { sentiment, emotions })
    }
}

/// Accepts both `[[{label, score}, ...]]` and `[{label, score}, ...]`.
fn parse_label_scores(data: Value) -> Result<Vec<LabelScore>> {
    let inner = match data {
        Value::Array(mut outer) if matches!(outer.first(), Some(Value::Array(_))) => outer.swap_remove(0),
        other => other,
    };
    Ok(serde_json::from_value(inner)?)
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("", 512), "");
    }

    #[test]
    fn test_parse_nested_label_scores() {
        let data = json!([[{"label": "joy", "score": 0.8}, {"label": "sadness", "score": 0.05}]]);
        let scores = parse_label_scores(data).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, "joy");
    }

    #[test]
    fn test_parse_flat_label_scores() {
        let data = json!([{"label": "POSITIVE", "score": 0.99}]);
        let scores = parse_label_scores(data).unwrap();
        assert_eq!(scores[0].label, "POSITIVE");
        assert_eq!(scores[0].score, 0.99);
    }

    #[test]
    fn test_parse_error_payload() {
        let data = json!({"error": "Model is currently loading"});
        assert!(parse_label_scores(data).is_err());
    }
}
