use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::constants::quiz_prompts::{generation_example, QUESTION_GENERATOR_PROMPT};
use crate::errors::{QuizError, QuizResult};
use crate::models::domain::{CorrectAnswer, Difficulty, Question, QuestionType};
use crate::models::dto::GeneratedQuestionDto;
use crate::providers::{ChatMessage, ChatModel};
use crate::services::context_sampler::SampledContext;

static JSON_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)\n?```")
        .expect("JSON_FENCE_REGEX is a valid regex pattern")
});

/// Outcome of one generation round. `questions` always holds exactly
/// the requested count; `padded` says how many at the tail are
/// placeholders, and `llm_error` carries a provider failure the host
/// should surface alongside the degraded batch.
#[derive(Clone, Debug)]
pub struct QuestionBatch {
    pub questions: Vec<Question>,
    pub padded: usize,
    pub llm_error: Option<QuizError>,
}

impl QuestionBatch {
    /// True when every question came from the model, grounded in the
    /// sampled context.
    pub fn is_fully_grounded(&self) -> bool {
        self.padded == 0 && self.llm_error.is_none()
    }
}

/// Turns sampled context into validated [`Question`]s via one chat
/// call per attempt. Malformed records are dropped and retried once
/// for the shortfall; whatever is still missing is padded with clearly
/// marked placeholders so the batch never comes up short.
pub struct QuestionGenerator {
    model: Arc<dyn ChatModel>,
}

impl QuestionGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Generates `num_questions` questions of `question_type` at
    /// `difficulty` from `context`. Prompts in `avoid_prompts` (and
    /// prompts already accepted within this batch) are never repeated.
    ///
    /// Provider failures are not retried: the shortfall is padded and
    /// the error reported in-band on the batch. Malformed output gets
    /// one bounded retry before padding kicks in.
    pub async fn generate_batch(
        &self,
        context: &SampledContext,
        num_questions: usize,
        question_type: QuestionType,
        difficulty: Difficulty,
        avoid_prompts: &[String],
    ) -> QuestionBatch {
        log::info!(
            "Generating {} {} question(s) at {} difficulty from {} chunk(s)",
            num_questions,
            question_type.as_str(),
            difficulty.as_str(),
            context.source_refs.len()
        );

        let mut questions: Vec<Question> = Vec::with_capacity(num_questions);
        let mut avoid: Vec<String> = avoid_prompts.to_vec();
        let mut llm_error = None;

        // one bounded retry for malformed or short output; provider
        // failures break out immediately
        for attempt in 0..2 {
            let shortfall = num_questions - questions.len();
            if shortfall == 0 {
                break;
            }
            if attempt > 0 {
                log::warn!("Retrying generation for {} missing question(s)", shortfall);
            }

            match self
                .request_records(context, shortfall, question_type, difficulty, &avoid)
                .await
            {
                Ok(records) => {
                    for record in records {
                        if questions.len() == num_questions {
                            break;
                        }
                        match record.into_question(
                            question_type,
                            difficulty,
                            context.source_refs.clone(),
                        ) {
                            Ok(question) => {
                                if avoid.iter().any(|prompt| same_prompt(prompt, &question.prompt))
                                {
                                    log::warn!(
                                        "Dropping repeated question: {}",
                                        question.prompt
                                    );
                                    continue;
                                }
                                avoid.push(question.prompt.clone());
                                questions.push(question);
                            }
                            Err(err) => log::warn!("Dropping malformed record: {}", err),
                        }
                    }
                }
                Err(QuizError::MalformedGeneration(reason)) => {
                    log::warn!("Generation response unusable: {}", reason);
                }
                Err(err) => {
                    log::error!("Provider call failed, padding the batch: {}", err);
                    llm_error = Some(err);
                    break;
                }
            }
        }

        let padded = num_questions - questions.len();
        let mut ordinal = questions.len() + 1;
        while questions.len() < num_questions {
            let placeholder = fallback_question(question_type, difficulty, ordinal);
            ordinal += 1;
            // the model may have echoed a placeholder sentence; skip
            // collided ordinals so batch prompts stay unique
            if avoid.iter().any(|prompt| same_prompt(prompt, &placeholder.prompt)) {
                continue;
            }
            avoid.push(placeholder.prompt.clone());
            questions.push(placeholder);
        }

        if padded > 0 {
            log::warn!(
                "Padded {} of {} question(s) with placeholders",
                padded,
                num_questions
            );
        }

        QuestionBatch {
            questions,
            padded,
            llm_error,
        }
    }

    async fn request_records(
        &self,
        context: &SampledContext,
        count: usize,
        question_type: QuestionType,
        difficulty: Difficulty,
        avoid: &[String],
    ) -> QuizResult<Vec<GeneratedQuestionDto>> {
        let request = build_generation_request(context, count, question_type, difficulty, avoid);
        let messages = [
            ChatMessage::system(QUESTION_GENERATOR_PROMPT),
            ChatMessage::user(request),
        ];

        let response = self.model.chat(&messages).await?;
        parse_records(&response)
    }
}

fn build_generation_request(
    context: &SampledContext,
    count: usize,
    question_type: QuestionType,
    difficulty: Difficulty,
    avoid: &[String],
) -> String {
    let schema = serde_json::to_string_pretty(&schemars::schema_for!(GeneratedQuestionDto))
        .unwrap_or_else(|_| "{}".to_string());

    let mut request = format!(
        "Create {count} {difficulty} level {question_type} question(s) based on the context below.\n\n\
         Difficulty requirement: {guideline}\n\n\
         Context:\n{context}\n\n",
        count = count,
        difficulty = difficulty.as_str(),
        question_type = question_type.as_str(),
        guideline = difficulty.guideline(),
        context = context.text,
    );

    if !avoid.is_empty() {
        request.push_str("DO NOT REPEAT any of these previously asked questions:\n");
        for prompt in avoid {
            request.push_str("- ");
            request.push_str(prompt);
            request.push('\n');
        }
        request.push('\n');
    }

    request.push_str(&format!(
        "Each record must conform to this JSON Schema:\n{schema}\n\n\
         Example record:\n{example}\n\n\
         Return a JSON array containing exactly {count} record(s).",
        schema = schema,
        example = generation_example(question_type),
        count = count,
    ));

    request
}

/// Accepts a JSON array or a single object, fenced or bare. Records
/// that fail to deserialize are dropped individually so one bad record
/// never poisons the rest of the response.
fn parse_records(response: &str) -> QuizResult<Vec<GeneratedQuestionDto>> {
    let json = extract_json(response);
    let value: serde_json::Value = serde_json::from_str(json).map_err(|err| {
        QuizError::MalformedGeneration(format!("response is not valid JSON: {}", err))
    })?;

    let raw_records = match value {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        other => {
            return Err(QuizError::MalformedGeneration(format!(
                "expected a JSON array or object, got: {}",
                other
            )))
        }
    };

    Ok(raw_records
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<GeneratedQuestionDto>(raw) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("Dropping undeserializable record: {}", err);
                None
            }
        })
        .collect())
}

/// Strips a markdown code fence when the model wraps its output in one.
fn extract_json(response: &str) -> &str {
    match JSON_FENCE_REGEX.captures(response) {
        Some(captures) => captures
            .get(1)
            .map_or_else(|| response.trim(), |found| found.as_str().trim()),
        None => response.trim(),
    }
}

fn same_prompt(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Deterministic placeholder appended when generation falls short. The
/// empty `source_refs` marks it as ungrounded for the host; the
/// ordinal keeps prompts unique within a batch.
fn fallback_question(
    question_type: QuestionType,
    difficulty: Difficulty,
    ordinal: usize,
) -> Question {
    let prompt = format!(
        "Unable to generate an additional question from this context (placeholder {}).",
        ordinal
    );

    let (options, correct_answer) = match question_type {
        QuestionType::MultipleChoice => (
            vec![
                "This is a placeholder question".to_string(),
                "This is a generated question".to_string(),
                "This is a graded question".to_string(),
                "This is a bonus question".to_string(),
            ],
            CorrectAnswer::OptionIndex(0),
        ),
        QuestionType::TrueFalse => (Vec::new(), CorrectAnswer::Boolean(true)),
        QuestionType::ShortAnswer => (Vec::new(), CorrectAnswer::Text("placeholder".to_string())),
    };

    Question {
        id: Uuid::new_v4().to_string(),
        question_type,
        prompt,
        options,
        correct_answer,
        explanation:
            "Question generation could not produce enough questions from the selected content."
                .to_string(),
        key_points: Vec::new(),
        source_refs: Vec::new(),
        difficulty,
        created_at: Utc::now(),
    }
}
