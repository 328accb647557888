use crate::models::domain::{CorrectAnswer, Difficulty, Question, QuestionType};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use chrono::Utc;

    /// Creates a grounded multiple-choice question with four options;
    /// "Mercury" (index 1, letter B) is correct.
    pub fn multiple_choice_question() -> Question {
        Question {
            id: "q-mc-1".to_string(),
            question_type: QuestionType::MultipleChoice,
            prompt: "Which planet is closest to the sun?".to_string(),
            options: vec![
                "Venus".to_string(),
                "Mercury".to_string(),
                "Mars".to_string(),
                "Earth".to_string(),
            ],
            correct_answer: CorrectAnswer::OptionIndex(1),
            explanation: "Mercury orbits closest to the sun.".to_string(),
            key_points: vec![],
            source_refs: vec!["astronomy.md#0".to_string()],
            difficulty: Difficulty::Easy,
            created_at: Utc::now(),
        }
    }

    /// Creates a grounded true/false question whose correct answer is
    /// `true`.
    pub fn true_false_question() -> Question {
        Question {
            id: "q-tf-1".to_string(),
            question_type: QuestionType::TrueFalse,
            prompt: "Photosynthesis takes place in the chloroplasts.".to_string(),
            options: vec![],
            correct_answer: CorrectAnswer::Boolean(true),
            explanation: "Chloroplasts host the light-dependent reactions.".to_string(),
            key_points: vec![],
            source_refs: vec!["plants.md#0".to_string()],
            difficulty: Difficulty::Medium,
            created_at: Utc::now(),
        }
    }

    /// Creates a grounded short-answer question with key points for the
    /// judge.
    pub fn short_answer_question() -> Question {
        Question {
            id: "q-sa-1".to_string(),
            question_type: QuestionType::ShortAnswer,
            prompt: "Why do most leaves look green?".to_string(),
            options: vec![],
            correct_answer: CorrectAnswer::Text("Chlorophyll reflects green light".to_string()),
            explanation: "Chlorophyll absorbs red and blue wavelengths.".to_string(),
            key_points: vec!["chlorophyll".to_string(), "reflects green light".to_string()],
            source_refs: vec!["plants.md#1".to_string()],
            difficulty: Difficulty::Medium,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::QuestionType;

    #[test]
    fn test_fixtures_multiple_choice_answer_resolves() {
        let question = multiple_choice_question();
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.correct_answer_text(), "Mercury");
        assert!(question.is_grounded());
    }

    #[test]
    fn test_fixtures_true_false_has_boolean_key() {
        let question = true_false_question();
        assert_eq!(question.correct_answer_text(), "true");
        assert!(question.options.is_empty());
    }

    #[test]
    fn test_fixtures_short_answer_carries_key_points() {
        let question = short_answer_question();
        assert!(!question.key_points.is_empty());
        assert!(question.is_grounded());
    }
}
