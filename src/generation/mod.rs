pub mod gemini;
pub mod parse;
pub mod source;

pub use gemini::GeminiClient;
pub use source::{GenerationError, QuestionSource};
