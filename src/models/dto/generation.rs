use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{QuizError, QuizResult};
use crate::models::domain::{CorrectAnswer, Difficulty, Question, QuestionType};

static LETTER_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[A-Da-d][\).:\-]\s*").expect("LETTER_PREFIX_REGEX is a valid regex pattern")
});

/// Wire shape the model is instructed to emit for each question record.
/// Conversion into a domain [`Question`] performs the per-record
/// validation; a record that fails converts to `MalformedGeneration`
/// and is dropped by the generator without poisoning its batch.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct GeneratedQuestionDto {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl GeneratedQuestionDto {
    pub fn into_question(
        self,
        question_type: QuestionType,
        difficulty: Difficulty,
        source_refs: Vec<String>,
    ) -> QuizResult<Question> {
        let prompt = self.question.trim().to_string();
        if prompt.is_empty() {
            return Err(QuizError::MalformedGeneration(
                "record has an empty question".to_string(),
            ));
        }

        let answer = self.correct_answer.trim();
        if answer.is_empty() {
            return Err(QuizError::MalformedGeneration(format!(
                "record '{}' has an empty correct_answer",
                prompt
            )));
        }

        let (options, correct_answer, key_points) = match question_type {
            QuestionType::MultipleChoice => {
                let options: Vec<String> = self
                    .options
                    .iter()
                    .map(|option| strip_letter_prefix(option).to_string())
                    .collect();
                if options.len() != 4 {
                    return Err(QuizError::MalformedGeneration(format!(
                        "record '{}' has {} options, expected 4",
                        prompt,
                        options.len()
                    )));
                }
                if options.iter().any(|option| option.trim().is_empty()) {
                    return Err(QuizError::MalformedGeneration(format!(
                        "record '{}' has a blank option",
                        prompt
                    )));
                }

                let index = resolve_option_index(answer, &options).ok_or_else(|| {
                    QuizError::MalformedGeneration(format!(
                        "record '{}' answer '{}' does not match any option",
                        prompt, answer
                    ))
                })?;

                (options, CorrectAnswer::OptionIndex(index), Vec::new())
            }
            QuestionType::TrueFalse => {
                let value = parse_bool_answer(answer).ok_or_else(|| {
                    QuizError::MalformedGeneration(format!(
                        "record '{}' answer '{}' is not true or false",
                        prompt, answer
                    ))
                })?;

                (Vec::new(), CorrectAnswer::Boolean(value), Vec::new())
            }
            QuestionType::ShortAnswer => (
                Vec::new(),
                CorrectAnswer::Text(answer.to_string()),
                self.key_points
                    .into_iter()
                    .map(|point| point.trim().to_string())
                    .filter(|point| !point.is_empty())
                    .collect(),
            ),
        };

        Ok(Question {
            id: Uuid::new_v4().to_string(),
            question_type,
            prompt,
            options,
            correct_answer,
            explanation: self.explanation.trim().to_string(),
            key_points,
            source_refs,
            difficulty,
            created_at: Utc::now(),
        })
    }
}

/// Drops a leading "A) ", "b. ", etc. Models trained on lettered option
/// lists emit them even when told not to.
pub(crate) fn strip_letter_prefix(value: &str) -> &str {
    match LETTER_PREFIX_REGEX.find(value) {
        Some(found) => value[found.end()..].trim(),
        None => value.trim(),
    }
}

/// Maps the model's `correct_answer` string onto an option index:
/// exact option text first, then a bare letter A-D.
fn resolve_option_index(answer: &str, options: &[String]) -> Option<usize> {
    let stripped = strip_letter_prefix(answer);
    if let Some(index) = options
        .iter()
        .position(|option| option.trim().eq_ignore_ascii_case(stripped))
    {
        return Some(index);
    }

    letter_index(answer).filter(|index| *index < options.len())
}

pub(crate) fn letter_index(answer: &str) -> Option<usize> {
    let trimmed = answer.trim().trim_end_matches(['.', ')', ':']).trim();
    let mut chars = trimmed.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    match letter.to_ascii_uppercase() {
        'A' => Some(0),
        'B' => Some(1),
        'C' => Some(2),
        'D' => Some(3),
        _ => None,
    }
}

pub(crate) fn parse_bool_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc_dto() -> GeneratedQuestionDto {
        GeneratedQuestionDto {
            question: "Which gas do plants absorb during photosynthesis?".to_string(),
            options: vec![
                "A) Oxygen".to_string(),
                "B) Carbon dioxide".to_string(),
                "C) Nitrogen".to_string(),
                "D) Hydrogen".to_string(),
            ],
            correct_answer: "B) Carbon dioxide".to_string(),
            explanation: "Plants take in carbon dioxide and release oxygen.".to_string(),
            key_points: vec![],
        }
    }

    #[test]
    fn multiple_choice_resolves_letter_prefixed_answer() {
        let question = mc_dto()
            .into_question(
                QuestionType::MultipleChoice,
                Difficulty::Easy,
                vec!["bio.md#2".to_string()],
            )
            .expect("record should convert");

        assert_eq!(question.correct_answer, CorrectAnswer::OptionIndex(1));
        assert_eq!(question.options[1], "Carbon dioxide");
        assert_eq!(question.source_refs, vec!["bio.md#2".to_string()]);
        assert!(question.is_grounded());
    }

    #[test]
    fn multiple_choice_resolves_bare_letter_answer() {
        let mut dto = mc_dto();
        dto.correct_answer = "b".to_string();

        let question = dto
            .into_question(QuestionType::MultipleChoice, Difficulty::Easy, vec![])
            .expect("record should convert");

        assert_eq!(question.correct_answer, CorrectAnswer::OptionIndex(1));
    }

    #[test]
    fn multiple_choice_rejects_wrong_option_count() {
        let mut dto = mc_dto();
        dto.options.pop();

        let err = dto
            .into_question(QuestionType::MultipleChoice, Difficulty::Easy, vec![])
            .unwrap_err();

        assert!(matches!(err, QuizError::MalformedGeneration(_)));
    }

    #[test]
    fn multiple_choice_rejects_unmatched_answer() {
        let mut dto = mc_dto();
        dto.correct_answer = "Helium".to_string();

        let err = dto
            .into_question(QuestionType::MultipleChoice, Difficulty::Easy, vec![])
            .unwrap_err();

        assert!(matches!(err, QuizError::MalformedGeneration(_)));
    }

    #[test]
    fn true_false_parses_answer_case_insensitively() {
        let dto = GeneratedQuestionDto {
            question: "The sun is a star.".to_string(),
            options: vec![],
            correct_answer: " TRUE ".to_string(),
            explanation: String::new(),
            key_points: vec![],
        };

        let question = dto
            .into_question(QuestionType::TrueFalse, Difficulty::Medium, vec![])
            .expect("record should convert");

        assert_eq!(question.correct_answer, CorrectAnswer::Boolean(true));
        assert!(question.options.is_empty());
    }

    #[test]
    fn true_false_rejects_non_boolean_answer() {
        let dto = GeneratedQuestionDto {
            question: "The sun is a star.".to_string(),
            options: vec![],
            correct_answer: "mostly".to_string(),
            explanation: String::new(),
            key_points: vec![],
        };

        let err = dto
            .into_question(QuestionType::TrueFalse, Difficulty::Medium, vec![])
            .unwrap_err();

        assert!(matches!(err, QuizError::MalformedGeneration(_)));
    }

    #[test]
    fn short_answer_keeps_key_points_and_drops_blanks() {
        let dto = GeneratedQuestionDto {
            question: "Why do leaves look green?".to_string(),
            options: vec![],
            correct_answer: "Chlorophyll reflects green light.".to_string(),
            explanation: "Chlorophyll absorbs red and blue light.".to_string(),
            key_points: vec![
                "chlorophyll".to_string(),
                "  ".to_string(),
                "reflects green".to_string(),
            ],
        };

        let question = dto
            .into_question(QuestionType::ShortAnswer, Difficulty::Medium, vec![])
            .expect("record should convert");

        assert_eq!(
            question.correct_answer,
            CorrectAnswer::Text("Chlorophyll reflects green light.".to_string())
        );
        assert_eq!(question.key_points, vec!["chlorophyll", "reflects green"]);
    }

    #[test]
    fn empty_question_rejected() {
        let dto = GeneratedQuestionDto {
            question: "   ".to_string(),
            options: vec![],
            correct_answer: "anything".to_string(),
            explanation: String::new(),
            key_points: vec![],
        };

        let err = dto
            .into_question(QuestionType::ShortAnswer, Difficulty::Easy, vec![])
            .unwrap_err();

        assert!(matches!(err, QuizError::MalformedGeneration(_)));
    }

    #[test]
    fn record_with_extra_fields_still_parses() {
        let raw = r#"{
            "question": "The sun is a star.",
            "correct_answer": "true",
            "explanation": "Basic astronomy.",
            "difficulty": "easy",
            "source": "astro.md"
        }"#;

        let dto: GeneratedQuestionDto =
            serde_json::from_str(raw).expect("extra fields should be ignored");
        assert_eq!(dto.question, "The sun is a star.");
    }
}
