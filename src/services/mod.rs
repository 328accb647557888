pub mod answer_validator;
pub mod context_sampler;
pub mod difficulty_adapter;
pub mod question_generator;
pub mod quiz_engine;

pub use answer_validator::AnswerValidator;
pub use context_sampler::{ContextSampler, SampledContext};
pub use difficulty_adapter::DifficultyAdapter;
pub use question_generator::{QuestionBatch, QuestionGenerator};
pub use quiz_engine::QuizEngine;
