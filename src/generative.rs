use anyhow::Result;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use std::sync::Arc;
use log::info;

use crate::config::AppConfig;
use crate::gemini::GeminiClient;
use crate::openai::OpenAIClient;

/// A service that turns a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider/model identifier used in logs
    fn name(&self) -> String;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerativeProvider {
    #[default]
    Gemini,
    OpenAI,
}

impl GenerativeProvider {
    pub fn as_str(&self) -> &str {
        match self {
            GenerativeProvider::Gemini => "gemini",
            GenerativeProvider::OpenAI => "openai",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(GenerativeProvider::Gemini),
            "openai" | "gpt" => Some(GenerativeProvider::OpenAI),
            _ => None,
        }
    }
}

/// Build the configured generator. Fails only when the provider's API key is missing.
pub fn build_generator(config: &AppConfig) -> Result<Arc<dyn TextGenerator>> {
    let timeout = config.request_timeout();
    let generator: Arc<dyn TextGenerator> = match config.generative_provider {
        GenerativeProvider::Gemini => {
            let api_key = config
                .google_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("GOOGLE_API_KEY is not configured"))?;
            Arc::new(
                GeminiClient::new(api_key, config.gemini_model.clone(), timeout)
                    .with_base_url(config.gemini_base_url.clone()),
            )
        }
        GenerativeProvider::OpenAI => {
            let api_key = config
                .openai_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is not configured"))?;
            Arc::new(
                OpenAIClient::new(api_key, config.openai_model.clone(), timeout)
                    .with_base_url(config.openai_base_url.clone()),
            )
        }
    };

    info!("Using text generator: {}", generator.name());
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!(GenerativeProvider::from_str("Gemini"), Some(GenerativeProvider::Gemini));
        assert_eq!(GenerativeProvider::from_str(" openai "), Some(GenerativeProvider::OpenAI));
        assert_eq!(GenerativeProvider::from_str("cohere"), None);
    }

    #[test]
    fn test_build_generator_requires_key() {
        let config = AppConfig {
            google_api_key: None,
            ..AppConfig::default()
        };
        assert!(build_generator(&config).is_err());

        let config = AppConfig {
            generative_provider: GenerativeProvider::OpenAI,
            openai_api_key: Some("sk-test".to_string()),
            ..AppConfig::default()
        };
        let generator = build_generator(&config).unwrap();
        assert!(generator.name().starts_with("openai"));
    }
}
