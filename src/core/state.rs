//! # Application State
//!
//! Core business state for quizmaster. This module contains domain logic
//! only - no TUI-specific types. Presentation state lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── source: Arc<dyn QuestionSource>   // question generator
//! └── session: QuizSession
//!     ├── selected_topic: String
//!     ├── questions: Vec<Question>      // empty, or exactly QUESTION_COUNT
//!     ├── current_question_index: usize
//!     ├── answers: Vec<Option<usize>>   // None = unanswered
//!     ├── score: usize                  // meaningful once quiz_completed
//!     ├── is_loading: bool              // generation in flight
//!     ├── error: Option<String>         // user-facing failure text
//!     ├── quiz_completed: bool
//!     └── show_review: bool             // results screen answer review
//! ```
//!
//! Session changes only happen through `update(session, intent)` in
//! action.rs. This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::generation::QuestionSource;

/// Every quiz has exactly this many questions.
pub const QUESTION_COUNT: usize = 5;

/// Every question has exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// One multiple-choice question.
///
/// Invariant: `options` holds exactly [`OPTION_COUNT`] unique entries and
/// `correct_index` points at one of them. The generation layer validates
/// this before a `Question` is ever constructed, so consumers can index
/// `options[correct_index]` without checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Sequential id ("1" through "5"), assigned at parse time.
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// The full mutable state of one quiz attempt, from topic selection through
/// completion. Owned by the event loop; all transitions go through
/// `update()` in action.rs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuizSession {
    pub selected_topic: String,
    pub questions: Vec<Question>,
    pub current_question_index: usize,
    /// Parallel to `questions`. `None` means not answered yet.
    pub answers: Vec<Option<usize>>,
    pub score: usize,
    pub is_loading: bool,
    pub error: Option<String>,
    pub quiz_completed: bool,
    pub show_review: bool,
}

impl QuizSession {
    /// The question under the cursor, if any are loaded.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    /// The recorded answer for the question under the cursor.
    pub fn current_answer(&self) -> Option<usize> {
        self.answers
            .get(self.current_question_index)
            .copied()
            .flatten()
    }

    /// How many questions have an answer recorded.
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// True when the cursor sits on the final question.
    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current_question_index + 1 == self.questions.len()
    }
}

pub struct App {
    pub source: Arc<dyn QuestionSource>,
    pub session: QuizSession,
}

impl App {
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            session: QuizSession::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_session, test_app};

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.session, QuizSession::default());
        assert!(!app.session.is_loading);
        assert!(app.session.questions.is_empty());
        assert_eq!(app.source.name(), "static");
    }

    #[test]
    fn test_current_question_empty_session() {
        let session = QuizSession::default();
        assert!(session.current_question().is_none());
        assert!(session.current_answer().is_none());
        assert!(!session.is_last_question());
    }

    #[test]
    fn test_current_question_follows_cursor() {
        let mut session = loaded_session();
        session.current_question_index = 2;
        let q = session.current_question().unwrap();
        assert_eq!(q.id, "3");
    }

    #[test]
    fn test_answered_count() {
        let mut session = loaded_session();
        assert_eq!(session.answered_count(), 0);
        session.answers[0] = Some(1);
        session.answers[3] = Some(0);
        assert_eq!(session.answered_count(), 2);
    }

    #[test]
    fn test_is_last_question() {
        let mut session = loaded_session();
        assert!(!session.is_last_question());
        session.current_question_index = QUESTION_COUNT - 1;
        assert!(session.is_last_question());
    }
}
