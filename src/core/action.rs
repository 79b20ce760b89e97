//! # Intents
//!
//! Everything that can happen to a quiz session becomes an `Intent`.
//! User picks an option? That's `Intent::AnswerQuestion(2)`.
//! Generation finishes? That's `Intent::SetQuestions(questions)`.
//!
//! The `update()` function takes the current session and an intent, then
//! applies the transition. No side effects here. I/O happens elsewhere:
//! transitions that need it return an `Effect` for the event loop to run.
//!
//! ```text
//! Session + Intent  →  update()  →  Session' (+ Effect)
//! ```
//!
//! This makes everything testable: drive a session through a sequence of
//! intents and assert on the fields. And debuggable: log every intent,
//! replay the exact quiz.

use log::warn;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::state::{OPTION_COUNT, QUESTION_COUNT, Question, QuizSession};

/// Everything the presentation layer can ask of a quiz session.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Record the topic the user picked (or typed).
    SetTopic(String),
    /// Install a freshly generated question set and reset all progress.
    SetQuestions(Vec<Question>),
    /// Flip the generation-in-flight flag.
    SetLoading(bool),
    /// Set or clear the user-facing error. Setting one ends loading.
    SetError(Option<String>),
    /// Record an option for the current question. Re-answering overwrites.
    AnswerQuestion(usize),
    /// Move the cursor forward (clamped to the last question).
    NextQuestion,
    /// Move the cursor back (clamped to the first question).
    PreviousQuestion,
    /// Score the recorded answers and mark the quiz completed.
    CompleteQuiz,
    /// Back to topic selection: everything returns to its initial value.
    ResetQuiz,
    /// Same questions again with shuffled options and cleared progress.
    RetakeQuiz,
    /// Show or hide the per-question review on the results screen.
    ToggleReview,
}

/// Work a transition wants done outside the reducer. The event loop runs
/// these after applying the intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The quiz was just completed: append the result to the score history.
    RecordScore,
}

/// Apply `intent` to `session`.
///
/// Invalid intents (answering with no questions loaded, out-of-range option
/// indices, completing an empty session) are logged and ignored rather than
/// panicking, so a confused caller can never corrupt the session.
pub fn update(session: &mut QuizSession, intent: Intent) -> Effect {
    match intent {
        Intent::SetTopic(topic) => {
            session.selected_topic = topic;
        }
        Intent::SetQuestions(questions) => {
            if questions.len() != QUESTION_COUNT {
                warn!(
                    "SetQuestions ignored: expected {} questions, got {}",
                    QUESTION_COUNT,
                    questions.len()
                );
                return Effect::None;
            }
            session.answers = vec![None; questions.len()];
            session.questions = questions;
            session.current_question_index = 0;
            session.score = 0;
            session.is_loading = false;
            session.error = None;
            session.quiz_completed = false;
            session.show_review = false;
        }
        Intent::SetLoading(loading) => {
            session.is_loading = loading;
        }
        Intent::SetError(error) => {
            session.error = error;
            session.is_loading = false;
        }
        Intent::AnswerQuestion(option_index) => {
            if session.questions.is_empty() {
                warn!("AnswerQuestion ignored: no questions loaded");
                return Effect::None;
            }
            if option_index >= OPTION_COUNT {
                warn!(
                    "AnswerQuestion ignored: option index {} out of range",
                    option_index
                );
                return Effect::None;
            }
            session.answers[session.current_question_index] = Some(option_index);
        }
        Intent::NextQuestion => {
            let last = session.questions.len().saturating_sub(1);
            session.current_question_index = (session.current_question_index + 1).min(last);
        }
        Intent::PreviousQuestion => {
            session.current_question_index = session.current_question_index.saturating_sub(1);
        }
        Intent::CompleteQuiz => {
            if session.questions.is_empty() {
                warn!("CompleteQuiz ignored: no questions loaded");
                return Effect::None;
            }
            session.score = score_answers(&session.answers, &session.questions);
            session.quiz_completed = true;
            return Effect::RecordScore;
        }
        Intent::ResetQuiz => {
            *session = QuizSession::default();
        }
        Intent::RetakeQuiz => {
            let mut rng = rand::thread_rng();
            session.questions = session
                .questions
                .iter()
                .map(|q| shuffle_options(q, &mut rng))
                .collect();
            session.answers = vec![None; session.questions.len()];
            session.current_question_index = 0;
            session.score = 0;
            session.quiz_completed = false;
            session.show_review = false;
            session.is_loading = false;
            session.error = None;
        }
        Intent::ToggleReview => {
            session.show_review = !session.show_review;
        }
    }
    Effect::None
}

/// Number of positions where the recorded answer matches the correct option.
/// Unanswered questions never match.
pub fn score_answers(answers: &[Option<usize>], questions: &[Question]) -> usize {
    answers
        .iter()
        .zip(questions)
        .filter(|(answer, question)| **answer == Some(question.correct_index))
        .count()
}

/// Rebuild a question with its options in a fresh random order and
/// `correct_index` pointing at the new position of the correct option.
fn shuffle_options<R: Rng>(question: &Question, rng: &mut R) -> Question {
    let correct_text = question.options[question.correct_index].clone();
    let mut options = question.options.clone();
    options.shuffle(rng);
    let correct_index = options
        .iter()
        .position(|option| *option == correct_text)
        .expect("shuffle preserves every option");
    Question {
        id: question.id.clone(),
        text: question.text.clone(),
        options,
        correct_index,
    }
}
