use std::sync::Arc;

use chrono::Utc;

use crate::constants::quiz_prompts::ANSWER_JUDGE_PROMPT;
use crate::errors::{QuizError, QuizResult};
use crate::models::domain::{AnswerResult, CorrectAnswer, GradedBy, Question, QuestionType};
use crate::models::dto::generation::{letter_index, parse_bool_answer, strip_letter_prefix};
use crate::providers::{ChatMessage, ChatModel};

/// Significant characters the contained side of a fuzzy match must
/// carry, so fragments like "a" or "the" cannot pass as answers.
const FUZZY_MIN_SIGNIFICANT: usize = 4;

/// Grades user answers against questions. Closed-form types are graded
/// deterministically with no model call; short answers escalate from
/// exact match to fuzzy containment to the LLM judge.
pub struct AnswerValidator {
    model: Arc<dyn ChatModel>,
}

impl AnswerValidator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Produces an [`AnswerResult`] for `user_answer`. Infallible: a
    /// judge failure folds into an ungraded result (`is_correct =
    /// None`) instead of erroring, so an answered question always gets
    /// a result and is never silently scored wrong.
    pub async fn validate(&self, question: &Question, user_answer: &str) -> AnswerResult {
        match question.question_type {
            QuestionType::MultipleChoice => grade_multiple_choice(question, user_answer),
            QuestionType::TrueFalse => grade_true_false(question, user_answer),
            QuestionType::ShortAnswer => self.grade_short_answer(question, user_answer).await,
        }
    }

    async fn grade_short_answer(&self, question: &Question, user_answer: &str) -> AnswerResult {
        let expected = question.correct_answer_text();
        let given = normalize(user_answer);

        if given.is_empty() {
            return result(
                question,
                user_answer,
                Some(false),
                GradedBy::ExactMatch,
                format!("No answer given. The expected answer was: {}", expected),
            );
        }

        if given == normalize(&expected) {
            return result(
                question,
                user_answer,
                Some(true),
                GradedBy::ExactMatch,
                grounded_feedback("Correct.", question),
            );
        }

        if fuzzy_match(&given, &normalize(&expected)) {
            return result(
                question,
                user_answer,
                Some(true),
                GradedBy::FuzzyMatch,
                grounded_feedback("Correct. Your answer matches the expected answer.", question),
            );
        }

        match self.judge(question, user_answer).await {
            Ok((verdict, feedback)) => result(
                question,
                user_answer,
                Some(verdict),
                GradedBy::LlmJudge,
                feedback,
            ),
            Err(err) => {
                log::error!("Short-answer judge unavailable: {}", err);
                result(
                    question,
                    user_answer,
                    None,
                    GradedBy::LlmJudge,
                    format!(
                        "This answer could not be graded automatically. \
                         Expected answer: \"{}\". Your answer: \"{}\".",
                        expected, user_answer
                    ),
                )
            }
        }
    }

    async fn judge(&self, question: &Question, user_answer: &str) -> QuizResult<(bool, String)> {
        log::info!("Delegating short-answer grading to the judge");

        let messages = [
            ChatMessage::system(ANSWER_JUDGE_PROMPT),
            ChatMessage::user(build_judge_request(question, user_answer)),
        ];
        let response = self
            .model
            .chat(&messages)
            .await
            .map_err(|err| QuizError::ValidationUnavailable(err.to_string()))?;

        parse_verdict(&response).ok_or_else(|| {
            QuizError::ValidationUnavailable(format!(
                "judge verdict was not CORRECT or INCORRECT: {}",
                response
            ))
        })
    }
}

/// Deterministic, no model call. The reply may be the option text
/// (with or without a letter prefix), a single letter A-D, or a
/// zero-based position into `options`.
fn grade_multiple_choice(question: &Question, user_answer: &str) -> AnswerResult {
    let is_correct = match question.correct_answer {
        CorrectAnswer::OptionIndex(expected) => {
            resolve_selected_option(user_answer, &question.options) == Some(expected)
        }
        // host-built questions may carry a textual answer key
        _ => normalize(user_answer) == normalize(&question.correct_answer_text()),
    };

    result(
        question,
        user_answer,
        Some(is_correct),
        GradedBy::ExactMatch,
        closed_form_feedback(question, is_correct),
    )
}

/// Deterministic, no model call. Anything that does not parse as
/// "true" or "false" is incorrect.
fn grade_true_false(question: &Question, user_answer: &str) -> AnswerResult {
    let is_correct = match question.correct_answer {
        CorrectAnswer::Boolean(expected) => parse_bool_answer(user_answer) == Some(expected),
        _ => normalize(user_answer) == normalize(&question.correct_answer_text()),
    };

    result(
        question,
        user_answer,
        Some(is_correct),
        GradedBy::ExactMatch,
        closed_form_feedback(question, is_correct),
    )
}

fn resolve_selected_option(user_answer: &str, options: &[String]) -> Option<usize> {
    let trimmed = user_answer.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped = normalize(strip_letter_prefix(trimmed));
    if let Some(index) = options
        .iter()
        .position(|option| normalize(option) == stripped)
    {
        return Some(index);
    }

    if let Ok(index) = trimmed.parse::<usize>() {
        return (index < options.len()).then_some(index);
    }

    letter_index(trimmed).filter(|index| *index < options.len())
}

/// Case-insensitive, whitespace-collapsed comparison form.
fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn significant_len(value: &str) -> usize {
    value.chars().filter(|c| c.is_alphanumeric()).count()
}

/// Bidirectional containment pre-check for short answers. Inputs are
/// already normalized; the contained side must carry at least
/// [`FUZZY_MIN_SIGNIFICANT`] alphanumeric characters.
fn fuzzy_match(given: &str, expected: &str) -> bool {
    (expected.contains(given) && significant_len(given) >= FUZZY_MIN_SIGNIFICANT)
        || (given.contains(expected) && significant_len(expected) >= FUZZY_MIN_SIGNIFICANT)
}

fn closed_form_feedback(question: &Question, is_correct: bool) -> String {
    if is_correct {
        grounded_feedback("Correct.", question)
    } else {
        let lead = format!(
            "Incorrect. The correct answer is: {}.",
            question.correct_answer_text()
        );
        grounded_feedback(&lead, question)
    }
}

fn grounded_feedback(lead: &str, question: &Question) -> String {
    if question.explanation.is_empty() {
        lead.to_string()
    } else {
        format!("{} {}", lead, question.explanation)
    }
}

fn build_judge_request(question: &Question, user_answer: &str) -> String {
    let key_points = if question.key_points.is_empty() {
        "(none)".to_string()
    } else {
        question.key_points.join(", ")
    };

    format!(
        "Question: {}\nExpected answer: {}\nKey points: {}\nUser's answer: {}",
        question.prompt,
        question.correct_answer_text(),
        key_points,
        user_answer,
    )
}

/// Splits the judge's reply into a verdict and user-facing feedback.
/// Anything not starting with CORRECT or INCORRECT is unparseable and
/// must surface as ungraded, never as incorrect.
fn parse_verdict(response: &str) -> Option<(bool, String)> {
    let trimmed = response.trim();
    let upper = trimmed.to_uppercase();

    let (verdict, verdict_len) = if upper.starts_with("INCORRECT") {
        (false, "INCORRECT".len())
    } else if upper.starts_with("CORRECT") {
        (true, "CORRECT".len())
    } else {
        return None;
    };

    let feedback = trimmed[verdict_len..]
        .trim_start_matches([':', '.', ',', '-', ' '])
        .trim();
    let feedback = if feedback.is_empty() {
        if verdict { "Correct." } else { "Incorrect." }.to_string()
    } else {
        feedback.to_string()
    };

    Some((verdict, feedback))
}

fn result(
    question: &Question,
    user_answer: &str,
    is_correct: Option<bool>,
    graded_by: GradedBy,
    feedback: String,
) -> AnswerResult {
    AnswerResult {
        question_id: question.id.clone(),
        user_answer: user_answer.to_string(),
        is_correct,
        graded_by,
        feedback,
        answered_at: Utc::now(),
    }
}
