use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::QuizResult;
use crate::models::domain::answer_result::AnswerResult;
use crate::models::domain::question::{Difficulty, Question};
use crate::models::domain::quiz_config::QuizConfig;

/// How many graded outcomes the difficulty adapter looks back over.
pub const OUTCOME_WINDOW: usize = 3;

/// One user's quiz run. Owned by the caller and passed `&mut` into the
/// engine; serializable so the host can persist it between turns.
///
/// `questions` and `results` stay aligned by construction: the engine
/// only ever grades the first unanswered question, so `results[i]`
/// always belongs to `questions[i]`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct QuizSession {
    pub id: String,
    pub config: QuizConfig,
    pub questions: Vec<Question>,
    pub results: Vec<AnswerResult>,
    recent_outcomes: VecDeque<bool>,
    current_difficulty: Difficulty,
    #[serde(default)]
    served_chunks: HashSet<String>,
    #[serde(default)]
    last_served: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(config: QuizConfig) -> QuizResult<Self> {
        config.validate()?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            current_difficulty: config.difficulty.starting_level(),
            config,
            questions: Vec::new(),
            results: Vec::new(),
            recent_outcomes: VecDeque::with_capacity(OUTCOME_WINDOW),
            served_chunks: HashSet::new(),
            last_served: Vec::new(),
            started_at: Utc::now(),
        })
    }

    pub fn current_difficulty(&self) -> Difficulty {
        self.current_difficulty
    }

    pub(crate) fn set_difficulty(&mut self, level: Difficulty) {
        self.current_difficulty = level;
    }

    /// Graded outcomes, oldest first, at most [`OUTCOME_WINDOW`] entries.
    pub fn outcome_window(&self) -> Vec<bool> {
        self.recent_outcomes.iter().copied().collect()
    }

    pub(crate) fn push_outcome(&mut self, outcome: bool) {
        if self.recent_outcomes.len() == OUTCOME_WINDOW {
            self.recent_outcomes.pop_front();
        }
        self.recent_outcomes.push_back(outcome);
    }

    /// The question the next submitted answer will be graded against.
    pub fn next_unanswered(&self) -> Option<&Question> {
        self.questions.get(self.results.len())
    }

    pub fn is_complete(&self) -> bool {
        self.results.len() >= self.config.num_questions
    }

    /// Prompts already asked this session, used as the generator's
    /// avoid-list.
    pub fn asked_prompts(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.prompt.clone()).collect()
    }

    pub(crate) fn was_served(&self, chunk_id: &str) -> bool {
        self.served_chunks.contains(chunk_id)
    }

    pub(crate) fn last_served(&self) -> &[String] {
        &self.last_served
    }

    pub(crate) fn mark_served(&mut self, chunk_ids: &[String]) {
        for id in chunk_ids {
            self.served_chunks.insert(id.clone());
        }
        self.last_served = chunk_ids.to_vec();
    }
}
