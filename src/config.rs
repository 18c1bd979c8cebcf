use serde::{Deserialize, Serialize};
use log::{info, warn};
use std::time::Duration;

use crate::gemini::DEFAULT_GEMINI_MODEL;
use crate::generative::GenerativeProvider;
use crate::openai::DEFAULT_OPENAI_MODEL;

pub const CONFIG_FILE: &str = "analyzer";
pub const ENV_PREFIX: &str = "ANALYZER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "interview_analyzer".to_string(),
            user: "analyzer".to_string(),
            password: String::new(),
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!("postgres://{}:{}@{}:{}/{}", self.user, self.password, self.host, self.port, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generative_provider: GenerativeProvider,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,

    pub deepgram_api_key: Option<String>,
    pub deepgram_model: String,
    pub deepgram_language: String,
    pub deepgram_base_url: String,

    pub huggingface_api_key: Option<String>,
    pub huggingface_base_url: String,
    pub sentiment_model: String,
    pub emotion_model: String,
    /// Classifiers only see this many leading characters of the transcript
    pub classification_prefix_chars: usize,

    pub ffmpeg_path: String,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,

    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generative_provider: GenerativeProvider::Gemini,
            google_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            deepgram_api_key: None,
            deepgram_model: "nova-2".to_string(),
            deepgram_language: "en-US".to_string(),
            deepgram_base_url: "https://api.deepgram.com/v1".to_string(),
            huggingface_api_key: None,
            huggingface_base_url: "https://api-inference.huggingface.co/models".to_string(),
            sentiment_model: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
            emotion_model: "j-hartmann/emotion-english-distilroberta-base".to_string(),
            classification_prefix_chars: 512,
            ffmpeg_path: "ffmpeg".to_string(),
            request_timeout_secs: 60,
            cache_ttl_secs: 300,
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env`, then `analyzer.toml` (optional), then `ANALYZER_*` variables,
    /// then the well-known provider variables (`GOOGLE_API_KEY`, `DB_HOST`, ...).
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;
        app_config.apply_env_overrides(get_env_var);
        Ok(app_config)
    }

    /// Overlay provider variables that other tools in the stack already use.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("GENERATIVE_PROVIDER") {
            match GenerativeProvider::from_str(&provider) {
                Some(p) => self.generative_provider = p,
                None => warn!("Unknown GENERATIVE_PROVIDER '{}', keeping {}", provider, self.generative_provider.as_str()),
            }
        }

        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.google_api_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(key) = lookup("DEEPGRAM_API_KEY") {
            self.deepgram_api_key = Some(key);
        }
        if let Some(model) = lookup("DEEPGRAM_MODEL") {
            self.deepgram_model = model;
        }
        if let Some(language) = lookup("DEEPGRAM_LANGUAGE") {
            self.deepgram_language = language;
        }
        if let Some(key) = lookup("HUGGINGFACE_API_KEY") {
            self.huggingface_api_key = Some(key);
        }

        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            match port.parse() {
                Ok(p) => self.database.port = p,
                Err(_) => warn!("Ignoring invalid DB_PORT '{}'", port),
            }
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = password;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn log_status(&self) {
        info!("🔧 Analyzer configuration:");
        info!("   Generative provider: {}", self.generative_provider.as_str());
        log_key("GOOGLE_API_KEY", self.google_api_key.as_deref());
        log_key("OPENAI_API_KEY", self.openai_api_key.as_deref());
        log_key("DEEPGRAM_API_KEY", self.deepgram_api_key.as_deref());
        log_key("HUGGINGFACE_API_KEY", self.huggingface_api_key.as_deref());
        info!(
            "   Database: {}@{}:{}/{}",
            self.database.user, self.database.host, self.database.port, self.database.name
        );
    }
}

fn log_key(name: &str, value: Option<&str>) {
    match value {
        Some(key) => info!("   ✅ {}: {} (length: {})", name, mask_secret(key), key.len()),
        None => warn!("   ❌ {}: Not available", name),
    }
}

pub fn mask_secret(key: &str) -> String {
    if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Runtime environment first, then values embedded at build time.
pub fn get_env_var(key: &str) -> Option<String> {
    if let Ok(value) = std::env::var(key) {
        if !value.is_empty() {
            return Some(value);
        }
    }

    let embedded_value = match key {
        "GOOGLE_API_KEY" => option_env!("GOOGLE_API_KEY"),
        "OPENAI_API_KEY" => option_env!("OPENAI_API_KEY"),
        "DEEPGRAM_API_KEY" => option_env!("DEEPGRAM_API_KEY"),
        "HUGGINGFACE_API_KEY" => option_env!("HUGGINGFACE_API_KEY"),
        _ => None,
    };

    embedded_value
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
