use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::errors::{QuizError, QuizResult};
use crate::models::domain::{
    AnswerResult, DifficultyMode, QuestionSelection, QuestionType, QuizSession,
};
use crate::providers::ChatModel;
use crate::repositories::KnowledgeStore;
use crate::services::answer_validator::AnswerValidator;
use crate::services::context_sampler::ContextSampler;
use crate::services::difficulty_adapter::DifficultyAdapter;
use crate::services::question_generator::{QuestionBatch, QuestionGenerator};

/// Orchestrates one quiz turn end to end: sample context, generate
/// questions, grade answers, adapt difficulty. Holds no session state;
/// the caller owns the [`QuizSession`] and passes it `&mut` into every
/// turn, so one engine serves any number of concurrent sessions.
pub struct QuizEngine {
    sampler: ContextSampler,
    generator: QuestionGenerator,
    validator: AnswerValidator,
}

impl QuizEngine {
    pub fn new(store: Arc<dyn KnowledgeStore>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            sampler: ContextSampler::new(store),
            generator: QuestionGenerator::new(Arc::clone(&model)),
            validator: AnswerValidator::new(model),
        }
    }

    /// One turn of the quiz loop: a single new question appended to the
    /// session, generated from fresh context at the session's current
    /// difficulty.
    pub async fn next_question(
        &self,
        session: &mut QuizSession,
        topic: Option<&str>,
    ) -> QuizResult<QuestionBatch> {
        self.next_batch(session, topic, 1).await
    }

    /// Same as [`next_question`](Self::next_question) but generates
    /// `count` questions from one sampled context, for hosts that
    /// pre-generate a whole round up front.
    pub async fn next_batch(
        &self,
        session: &mut QuizSession,
        topic: Option<&str>,
        count: usize,
    ) -> QuizResult<QuestionBatch> {
        let question_type = resolve_question_type(session.config.question_type);
        let difficulty = match session.config.difficulty {
            DifficultyMode::Fixed(level) => level,
            DifficultyMode::Adaptive(_) => session.current_difficulty(),
        };

        log::info!(
            "Session {}: serving {} {} question(s) at {}",
            session.id,
            count,
            question_type.as_str(),
            difficulty.as_str()
        );

        let context = self.sampler.sample(session, topic).await?;
        let avoid_prompts = session.asked_prompts();
        let batch = self
            .generator
            .generate_batch(&context, count, question_type, difficulty, &avoid_prompts)
            .await;

        session.questions.extend(batch.questions.iter().cloned());
        Ok(batch)
    }

    /// Grades `user_answer` against the next unanswered question,
    /// appends the result, and feeds the outcome to the difficulty
    /// adapter. The questions/results pairing holds by construction:
    /// answers always grade against `questions[results.len()]`.
    pub async fn submit_answer(
        &self,
        session: &mut QuizSession,
        user_answer: &str,
    ) -> QuizResult<AnswerResult> {
        let question = session.next_unanswered().cloned().ok_or_else(|| {
            QuizError::QuestionNotFound("no pending question to answer".to_string())
        })?;

        let result = self.validator.validate(&question, user_answer).await;
        log::info!(
            "Session {}: graded question {} as {:?} via {:?}",
            session.id,
            question.id,
            result.is_correct,
            result.graded_by
        );

        DifficultyAdapter::record(session, result.is_correct);
        session.results.push(result.clone());
        Ok(result)
    }
}

/// Collapses the session's type policy to a concrete type for this
/// turn. `Mixed` draws uniformly at random, matching the original
/// chatbot's behavior.
fn resolve_question_type(selection: QuestionSelection) -> QuestionType {
    match selection {
        QuestionSelection::Fixed(question_type) => question_type,
        QuestionSelection::Mixed => {
            let pool = [
                QuestionType::MultipleChoice,
                QuestionType::TrueFalse,
                QuestionType::ShortAnswer,
            ];
            pool.choose(&mut thread_rng())
                .copied()
                .unwrap_or(QuestionType::MultipleChoice)
        }
    }
}
