pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod interceptors;
pub mod normalize;
pub mod prompt;
pub mod quiz;

// Convenient re-exports
pub use crate::core::{generate_quiz, LowLevelClient, QuizGenerator};
pub use config::Validation;
pub use error::{ConfigError, GenerationError, ParseError};
pub use normalize::{normalize, normalize_with};
pub use prompt::build_prompt;
pub use quiz::{DescriptiveQuestion, McqQuestion, Question, Quiz, QuizRequest, QuizType};
