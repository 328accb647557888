use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::question::{Difficulty, QuestionType};

/// Question-type policy for a session: every question the same type, or
/// a random type per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSelection {
    Fixed(QuestionType),
    Mixed,
}

/// Difficulty policy for a session. `Fixed` pins every question to one
/// level; `Adaptive` starts at the given level and moves with the
/// rolling outcome window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyMode {
    Fixed(Difficulty),
    Adaptive(Difficulty),
}

impl DifficultyMode {
    pub fn starting_level(&self) -> Difficulty {
        match self {
            DifficultyMode::Fixed(level) | DifficultyMode::Adaptive(level) => *level,
        }
    }

    pub fn is_adaptive(&self) -> bool {
        matches!(self, DifficultyMode::Adaptive(_))
    }
}

impl Default for DifficultyMode {
    fn default() -> Self {
        DifficultyMode::Adaptive(Difficulty::Medium)
    }
}

/// Session-scoped settings, fixed once the session starts.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct QuizConfig {
    /// Document ids the quiz draws from. An empty selection surfaces as
    /// `EmptyKnowledgeBase` when sampling.
    pub selected_documents: Vec<String>,

    #[validate(range(min = 1, max = 50))]
    pub num_questions: usize,

    pub question_type: QuestionSelection,

    pub difficulty: DifficultyMode,

    /// Minimum character length for randomly sampled context.
    #[validate(range(min = 40, max = 4000))]
    pub min_context_length: usize,

    /// Top-k chunks fetched for topic-directed sampling.
    #[validate(range(min = 1, max = 10))]
    pub topic_chunks: usize,
}

impl QuizConfig {
    pub fn new(selected_documents: Vec<String>) -> Self {
        Self {
            selected_documents,
            ..Self::default()
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            selected_documents: Vec::new(),
            num_questions: 5,
            question_type: QuestionSelection::Mixed,
            difficulty: DifficultyMode::default(),
            min_context_length: 200,
            topic_chunks: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = QuizConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.num_questions, 5);
        assert_eq!(config.min_context_length, 200);
        assert_eq!(config.topic_chunks, 3);
        assert_eq!(
            config.difficulty,
            DifficultyMode::Adaptive(Difficulty::Medium)
        );
    }

    #[test]
    fn test_zero_questions_rejected() {
        let config = QuizConfig {
            num_questions: 0,
            ..QuizConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_context_length_rejected() {
        let config = QuizConfig {
            min_context_length: 10,
            ..QuizConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_difficulty_mode_starting_level() {
        assert_eq!(
            DifficultyMode::Fixed(Difficulty::Hard).starting_level(),
            Difficulty::Hard
        );
        assert_eq!(
            DifficultyMode::Adaptive(Difficulty::Easy).starting_level(),
            Difficulty::Easy
        );
        assert!(DifficultyMode::Adaptive(Difficulty::Easy).is_adaptive());
        assert!(!DifficultyMode::Fixed(Difficulty::Easy).is_adaptive());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = QuizConfig {
            selected_documents: vec!["doc-1".to_string()],
            question_type: QuestionSelection::Fixed(QuestionType::TrueFalse),
            difficulty: DifficultyMode::Fixed(Difficulty::Hard),
            ..QuizConfig::default()
        };

        let json = serde_json::to_string(&config).expect("config should serialize");
        let parsed: QuizConfig = serde_json::from_str(&json).expect("config should deserialize");
        assert_eq!(config, parsed);
    }
}
