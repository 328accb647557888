use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which grading path produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum GradedBy {
    ExactMatch,
    FuzzyMatch,
    LlmJudge,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct AnswerResult {
    pub question_id: String,
    pub user_answer: String,
    /// `None` means ungraded: the judge was unreachable and the answer
    /// is neither scored correct nor incorrect.
    pub is_correct: Option<bool>,
    pub graded_by: GradedBy,
    pub feedback: String,
    pub answered_at: DateTime<Utc>,
}

impl AnswerResult {
    pub fn is_graded(&self) -> bool {
        self.is_correct.is_some()
    }
}
