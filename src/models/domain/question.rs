use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Next level up, clamped at `Hard`.
    pub fn promote(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// Next level down, clamped at `Easy`.
    pub fn demote(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }

    /// Cognitive-complexity instruction embedded in generation prompts.
    pub fn guideline(self) -> &'static str {
        match self {
            Difficulty::Easy => {
                "recall-level: test a single fact stated directly in the context"
            }
            Difficulty::Medium => {
                "application: require one inference step beyond what the context states"
            }
            Difficulty::Hard => {
                "synthesis: require multi-hop reasoning that connects several parts of the context"
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Answer key for a question. The variant is fixed by the question type:
/// `OptionIndex` for multiple choice, `Boolean` for true/false, `Text`
/// for short answer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum CorrectAnswer {
    OptionIndex(usize),
    Boolean(bool),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Question {
    pub id: String,
    pub question_type: QuestionType,
    pub prompt: String,
    /// Exactly four entries for multiple choice, empty otherwise.
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: CorrectAnswer,
    #[serde(default)]
    pub explanation: String,
    /// Grading hints for the short-answer judge; empty for other types.
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Chunk ids the question was generated from. Empty only for
    /// fallback placeholders.
    #[serde(default)]
    pub source_refs: Vec<String>,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn is_grounded(&self) -> bool {
        !self.source_refs.is_empty()
    }

    /// The answer key rendered as display text.
    pub fn correct_answer_text(&self) -> String {
        match &self.correct_answer {
            CorrectAnswer::OptionIndex(index) => {
                self.options.get(*index).cloned().unwrap_or_default()
            }
            CorrectAnswer::Boolean(value) => value.to_string(),
            CorrectAnswer::Text(text) => text.clone(),
        }
    }
}
