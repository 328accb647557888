pub mod generation;

pub use generation::GeneratedQuestionDto;
