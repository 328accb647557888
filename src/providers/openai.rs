use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::config::LlmConfig;
use crate::errors::{QuizError, QuizResult};
use crate::providers::{ChatMessage, ChatModel};

/// [`ChatModel`] backed by any OpenAI-compatible `/chat/completions`
/// endpoint. The request is built by hand so non-OpenAI providers that
/// reject unknown fields keep working.
pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionReply {
    choices: Vec<ReplyChoice>,
}

#[derive(Debug, Deserialize)]
struct ReplyChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl OpenAiChatModel {
    pub fn from_config(config: &LlmConfig) -> QuizResult<Self> {
        let api_key = config.api_key.as_ref().ok_or_else(|| {
            QuizError::LlmUnavailable("OPENAI_API_KEY is not set".to_string())
        })?;

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        if let Some(api_base) = &config.api_base {
            log::info!("Using custom chat completion base URL: {}", api_base);
            openai_config = openai_config.with_api_base(api_base);
        }

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn chat(&self, messages: &[ChatMessage]) -> QuizResult<String> {
        let request = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let reply: ChatCompletionReply = self.client.chat().create_byot(request).await?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(QuizError::LlmUnavailable(
                "model returned an empty completion".to_string(),
            ));
        }

        Ok(content)
    }
}
