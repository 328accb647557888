pub mod openai;

pub use openai::OpenAiChatModel;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::QuizResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// The single capability the engine needs from a language model. Both
/// generation and judging go through here, so one implementation serves
/// any OpenAI-compatible provider and tests can script replies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> QuizResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_roles_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChatRole::System).unwrap(),
            "\"system\""
        );
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
    }

    #[test]
    fn message_constructors_set_role_and_content() {
        let system = ChatMessage::system("be brief");
        assert_eq!(system.role, ChatRole::System);
        assert_eq!(system.content, "be brief");

        let user = ChatMessage::user("hello");
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(user.content, "hello");
    }
}
