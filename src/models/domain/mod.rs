pub mod answer_result;
pub mod question;
pub mod quiz_config;
pub mod session;
pub use answer_result::{AnswerResult, GradedBy};
pub use question::{CorrectAnswer, Difficulty, Question, QuestionType};
pub use quiz_config::{DifficultyMode, QuestionSelection, QuizConfig};
pub use session::{QuizSession, OUTCOME_WINDOW};
