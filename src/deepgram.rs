use anyhow::Result;
use async_trait::async_trait;
use log::{info, error, debug};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::interview::TranscriptSegment;
use crate::transcription::{Transcriber, Transcript};

/// Deepgram pre-recorded transcription of a WAV file
#[derive(Clone)]
pub struct DeepgramTranscriber {
    client: Client,
    api_key: String,
    model: String,
    language: String,
    base_url: String,
}

impl DeepgramTranscriber {
    pub fn new(api_key: String, model: String, language: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            model,
            language,
            base_url: "https://api.deepgram.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn listen_url(&self) -> String {
        format!("{}/listen", self.base_url)
    }

    fn listen_params(&self) -> [(&'static str, &str); 5] {
        [
            ("model", self.model.as_str()),
            ("language", self.language.as_str()),
            ("smart_format", "true"),
            ("punctuate", "true"),
            ("utterances", "true"),
        ]
    }
}

#[async_trait]
impl Transcriber for DeepgramTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let audio = tokio::fs::read(audio_path).await?;
        info!("Uploading {} bytes of audio to Deepgram ({})", audio.len(), self.model);

        let response = self
            .client
            .post(self.listen_url())
            .query(&self.listen_params())
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", "audio/wav")
            .body(audio)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Deepgram API error ({}): {}", status, error_text);
            return Err(anyhow::anyhow!("Deepgram API error ({}): {}", status, error_text));
        }

        let data: Value = response.json().await?;
        let transcript = parse_listen_response(&data);
        info!(
            "Deepgram transcript: {} characters, {} segments",
            transcript.text.len(),
            transcript.segments.len()
        );
        Ok(transcript)
    }
}

/// Pull the transcript text and utterance segments out of a `/listen` response.
pub fn parse_listen_response(data: &Value) -> Transcript {
    let text = data
        .pointer("/results/channels/0/alternatives/0/transcript")
        .and_then(|t| t.as_str())
        .unwrap_or("")
        .trim()
        .to_string();

    let segments = data
        .pointer("/results/utterances")
        .and_then(|u| u.as_array())
        .map(|utterances| {
            utterances
                .iter()
                .filter_map(|u| u.as_object())
                .map(|u| TranscriptSegment {
                    start: u.get("start").and_then(|v| v.as_f64()),
                    end: u.get("end").and_then(|v| v.as_f64()),
                    text: u.get("transcript").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                })
                .collect()
        })
        .unwrap_or_else(|| {
            debug!("Deepgram response carried no utterances");
            Vec::new()
        });

    Transcript { text, segments }
}
