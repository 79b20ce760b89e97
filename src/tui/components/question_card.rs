//! # Question Card Component
//!
//! The quiz screen: one question at a time with four labeled options.
//! Enter records the highlighted option, arrows move between questions,
//! `s` opens a submit confirmation (press again or Enter to confirm).
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `QuizScreenState` lives in `TuiState`
//! - `QuizScreen` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::core::state::{OPTION_COUNT, QuizSession};
use crate::tui::event::TuiEvent;
use crate::tui::ui::centered_rect;

pub const OPTION_LABELS: [&str; OPTION_COUNT] = ["A", "B", "C", "D"];

/// Events emitted by the quiz screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizScreenEvent {
    /// Record this option for the current question.
    Answer(usize),
    Next,
    Previous,
    /// Submission confirmed: finish the quiz.
    Complete,
    Quit,
}

/// Persistent state for the quiz screen.
pub struct QuizScreenState {
    /// Option the highlight sits on (not yet recorded).
    pub selected_option: usize,
    /// Submit confirmation popup open.
    pub confirm_submit: bool,
}

impl Default for QuizScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizScreenState {
    pub fn new() -> Self {
        Self {
            selected_option: 0,
            confirm_submit: false,
        }
    }

    /// Re-seat the highlight after the cursor moved to another question:
    /// land on the recorded answer if there is one.
    pub fn sync_selection(&mut self, session: &QuizSession) {
        self.selected_option = session.current_answer().unwrap_or(0);
        self.confirm_submit = false;
    }

    /// Handle a key event, returning a QuizScreenEvent if the screen should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<QuizScreenEvent> {
        // Any key other than the submit keys closes the confirmation popup
        let keeps_confirmation = matches!(event, TuiEvent::InputChar('s') | TuiEvent::Submit);
        if self.confirm_submit && !keeps_confirmation {
            self.confirm_submit = false;
            if matches!(event, TuiEvent::Escape) {
                return None;
            }
        }

        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
                self.selected_option = (self.selected_option + OPTION_COUNT - 1) % OPTION_COUNT;
                None
            }
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => {
                self.selected_option = (self.selected_option + 1) % OPTION_COUNT;
                None
            }
            TuiEvent::Submit => {
                if self.confirm_submit {
                    self.confirm_submit = false;
                    Some(QuizScreenEvent::Complete)
                } else {
                    Some(QuizScreenEvent::Answer(self.selected_option))
                }
            }
            TuiEvent::InputChar('s') => {
                if self.confirm_submit {
                    self.confirm_submit = false;
                    Some(QuizScreenEvent::Complete)
                } else {
                    self.confirm_submit = true;
                    None
                }
            }
            TuiEvent::CursorRight | TuiEvent::InputChar('n') => Some(QuizScreenEvent::Next),
            TuiEvent::CursorLeft | TuiEvent::InputChar('p') => Some(QuizScreenEvent::Previous),
            TuiEvent::InputChar('q') => Some(QuizScreenEvent::Quit),
            _ => None,
        }
    }
}

/// Transient render wrapper for the quiz screen.
pub struct QuizScreen<'a> {
    state: &'a QuizScreenState,
    session: &'a QuizSession,
}

impl<'a> QuizScreen<'a> {
    pub fn new(state: &'a QuizScreenState, session: &'a QuizSession) -> Self {
        Self { state, session }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(question) = self.session.current_question() else {
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.session.selected_topic))
            .title_bottom(
                Line::from(" ↑↓ Option  Enter Answer  ←→ Question  s Submit  q Quit ").centered(),
            )
            .padding(Padding::horizontal(2));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [progress_area, question_area, options_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(question_height(&question.text, inner.width)),
            Constraint::Min(OPTION_COUNT as u16),
        ])
        .areas(inner);

        let progress = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    "Question {} of {}",
                    self.session.current_question_index + 1,
                    self.session.questions.len()
                ),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "   answered {}/{}",
                    self.session.answered_count(),
                    self.session.questions.len()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        frame.render_widget(progress, progress_area);

        let question_text = Paragraph::new(question.text.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false });
        frame.render_widget(question_text, question_area);

        let recorded = self.session.current_answer();
        let option_lines: Vec<Line> = question
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let marker = if i == self.state.selected_option {
                    "▸ "
                } else {
                    "  "
                };
                let mut style = if recorded == Some(i) {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                if i == self.state.selected_option {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(
                    format!("{marker}{}. {option}", OPTION_LABELS[i]),
                    style,
                ))
            })
            .collect();
        let options = Paragraph::new(option_lines).wrap(Wrap { trim: false });
        frame.render_widget(options, options_area);

        if self.state.confirm_submit {
            self.render_confirmation(frame, area);
        }
    }

    fn render_confirmation(&self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 30, area);
        frame.render_widget(Clear, overlay);

        let answered = self.session.answered_count();
        let total = self.session.questions.len();
        let mut lines = vec![Line::from(format!("{answered} of {total} answered."))];
        if answered < total {
            lines.push(Line::from(Span::styled(
                "Unanswered questions score zero.",
                Style::default().fg(Color::Yellow),
            )));
        }

        let popup = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Submit quiz? ")
                .title_bottom(Line::from(" Enter Confirm  Esc Cancel ").centered())
                .padding(Padding::uniform(1)),
        );
        frame.render_widget(popup, overlay);
    }
}

/// Rows the question text needs at `width`, with a little headroom.
fn question_height(text: &str, width: u16) -> u16 {
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    paragraph.line_count(width.max(1)) as u16 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Intent, update};
    use crate::test_support::loaded_session;

    #[test]
    fn test_selection_wraps_both_directions() {
        let mut state = QuizScreenState::new();
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected_option, OPTION_COUNT - 1);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected_option, 0);

        for _ in 0..OPTION_COUNT {
            state.handle_event(&TuiEvent::InputChar('j'));
        }
        assert_eq!(state.selected_option, 0);
    }

    #[test]
    fn test_enter_answers_with_highlight() {
        let mut state = QuizScreenState::new();
        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        let event = state.handle_event(&TuiEvent::Submit);
        assert_eq!(event, Some(QuizScreenEvent::Answer(2)));
    }

    #[test]
    fn test_submit_needs_confirmation() {
        let mut state = QuizScreenState::new();
        assert_eq!(state.handle_event(&TuiEvent::InputChar('s')), None);
        assert!(state.confirm_submit);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(QuizScreenEvent::Complete)
        );
        assert!(!state.confirm_submit);
    }

    #[test]
    fn test_double_s_confirms() {
        let mut state = QuizScreenState::new();
        state.handle_event(&TuiEvent::InputChar('s'));
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('s')),
            Some(QuizScreenEvent::Complete)
        );
    }

    #[test]
    fn test_escape_cancels_confirmation() {
        let mut state = QuizScreenState::new();
        state.handle_event(&TuiEvent::InputChar('s'));
        assert_eq!(state.handle_event(&TuiEvent::Escape), None);
        assert!(!state.confirm_submit);
        // Enter now answers instead of completing
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(QuizScreenEvent::Answer(0))
        );
    }

    #[test]
    fn test_other_keys_cancel_confirmation_and_act() {
        let mut state = QuizScreenState::new();
        state.handle_event(&TuiEvent::InputChar('s'));
        let event = state.handle_event(&TuiEvent::CursorRight);
        assert_eq!(event, Some(QuizScreenEvent::Next));
        assert!(!state.confirm_submit);
    }

    #[test]
    fn test_navigation_and_quit_events() {
        let mut state = QuizScreenState::new();
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('n')),
            Some(QuizScreenEvent::Next)
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('p')),
            Some(QuizScreenEvent::Previous)
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('q')),
            Some(QuizScreenEvent::Quit)
        );
    }

    #[test]
    fn test_sync_selection_lands_on_recorded_answer() {
        let mut session = loaded_session();
        update(&mut session, Intent::AnswerQuestion(3));

        let mut state = QuizScreenState::new();
        state.sync_selection(&session);
        assert_eq!(state.selected_option, 3);

        update(&mut session, Intent::NextQuestion);
        state.sync_selection(&session);
        assert_eq!(state.selected_option, 0);
    }
}
