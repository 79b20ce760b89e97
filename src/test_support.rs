//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::state::{App, OPTION_COUNT, QUESTION_COUNT, Question, QuizSession};
use crate::generation::{GenerationError, QuestionSource};

/// A canned source for tests that don't need real API calls.
pub struct StaticSource;

#[async_trait]
impl QuestionSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(&self, _topic: &str) -> Result<Vec<Question>, GenerationError> {
        Ok(sample_questions())
    }

    fn clear_cache(&self) {}
}

/// Build one question without the construction ceremony.
pub fn question(
    id: &str,
    text: &str,
    options: [&str; OPTION_COUNT],
    correct_index: usize,
) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_index,
    }
}

/// Five questions with correct answers at positions 0, 1, 1, 3, 0.
pub fn sample_questions() -> Vec<Question> {
    vec![
        question(
            "1",
            "What does CPU stand for?",
            [
                "Central Processing Unit",
                "Core Program Utility",
                "Computer Power Unit",
                "Control Path Unifier",
            ],
            0,
        ),
        question(
            "2",
            "Which data structure uses first-in, first-out ordering?",
            ["Stack", "Queue", "Tree", "Graph"],
            1,
        ),
        question(
            "3",
            "What is the time complexity of binary search?",
            ["O(n)", "O(log n)", "O(n log n)", "O(1)"],
            1,
        ),
        question(
            "4",
            "Which protocol does the web use for secure transport?",
            ["FTP", "SMTP", "SSH", "TLS"],
            3,
        ),
        question(
            "5",
            "What does RAM lose when power is cut?",
            ["Its contents", "Its clock speed", "Its capacity", "Its bus width"],
            0,
        ),
    ]
}

/// Creates a test App with a StaticSource.
pub fn test_app() -> App {
    App::new(Arc::new(StaticSource))
}

/// A session with [`sample_questions`] loaded and nothing answered yet,
/// as if SetQuestions had just been applied.
pub fn loaded_session() -> QuizSession {
    QuizSession {
        selected_topic: "Computer Science".to_string(),
        questions: sample_questions(),
        answers: vec![None; QUESTION_COUNT],
        ..QuizSession::default()
    }
}
