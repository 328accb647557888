use secrecy::SecretString;
use std::env;

/// Connection settings for the chat-completion provider. Any
/// OpenAI-compatible endpoint works; `api_base` overrides the default
/// OpenAI host.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub api_base: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").ok().map(SecretString::from),
            api_base: env::var("OPENAI_API_BASE").ok().filter(|v| !v.trim().is_empty()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            temperature: env::var("QUIZ_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.7),
            max_tokens: env::var("QUIZ_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_key: Some(SecretString::from("test_api_key".to_string())),
            api_base: Some("http://localhost:11434/v1".to_string()),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}
