use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum QuizError {
    #[error("Knowledge base is empty: {0}")]
    EmptyKnowledgeBase(String),

    #[error("Language model unavailable: {0}")]
    LlmUnavailable(String),

    #[error("Malformed generation: {0}")]
    MalformedGeneration(String),

    #[error("Validation unavailable: {0}")]
    ValidationUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Knowledge store error: {0}")]
    StoreError(String),
}

impl QuizError {
    /// Stable code for host applications that map errors to UI messages.
    pub fn error_code(&self) -> &'static str {
        match self {
            QuizError::EmptyKnowledgeBase(_) => "EMPTY_KNOWLEDGE_BASE",
            QuizError::LlmUnavailable(_) => "LLM_UNAVAILABLE",
            QuizError::MalformedGeneration(_) => "MALFORMED_GENERATION",
            QuizError::ValidationUnavailable(_) => "VALIDATION_UNAVAILABLE",
            QuizError::InvalidConfig(_) => "INVALID_CONFIG",
            QuizError::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
            QuizError::StoreError(_) => "STORE_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for QuizError {
    fn from(err: validator::ValidationErrors) -> Self {
        QuizError::InvalidConfig(err.to_string())
    }
}

impl From<async_openai::error::OpenAIError> for QuizError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        QuizError::LlmUnavailable(err.to_string())
    }
}

pub type QuizResult<T> = Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            QuizError::EmptyKnowledgeBase("test".into()).error_code(),
            "EMPTY_KNOWLEDGE_BASE"
        );
        assert_eq!(
            QuizError::LlmUnavailable("test".into()).error_code(),
            "LLM_UNAVAILABLE"
        );
        assert_eq!(
            QuizError::ValidationUnavailable("test".into()).error_code(),
            "VALIDATION_UNAVAILABLE"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = QuizError::EmptyKnowledgeBase("no documents selected".into());
        assert_eq!(
            err.to_string(),
            "Knowledge base is empty: no documents selected"
        );
    }
}
