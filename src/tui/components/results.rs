//! # Results Component
//!
//! Shown once a quiz is completed: score gauge, feedback message, and an
//! optional per-question answer review in a scroll view.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ResultsScreenState` lives in `TuiState`
//! - `ResultsScreen` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::feedback::{feedback_message, percentage};
use crate::core::state::QuizSession;
use crate::tui::components::question_card::OPTION_LABELS;
use crate::tui::event::TuiEvent;

/// Events emitted by the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsScreenEvent {
    ToggleReview,
    Retake,
    NewQuiz,
    Quit,
}

/// Persistent state for the results screen.
pub struct ResultsScreenState {
    pub scroll_state: ScrollViewState,
}

impl Default for ResultsScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsScreenState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
        }
    }

    /// Handle a key event, returning a ResultsScreenEvent if the screen
    /// should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<ResultsScreenEvent> {
        match event {
            TuiEvent::InputChar('v') => Some(ResultsScreenEvent::ToggleReview),
            TuiEvent::InputChar('r') => Some(ResultsScreenEvent::Retake),
            TuiEvent::InputChar('n') => Some(ResultsScreenEvent::NewQuiz),
            TuiEvent::InputChar('q') | TuiEvent::Escape => Some(ResultsScreenEvent::Quit),
            TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                None
            }
            TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                None
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the results screen.
pub struct ResultsScreen<'a> {
    state: &'a mut ResultsScreenState,
    session: &'a QuizSession,
}

impl<'a> ResultsScreen<'a> {
    pub fn new(state: &'a mut ResultsScreenState, session: &'a QuizSession) -> Self {
        Self { state, session }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [summary_area, review_area] =
            Layout::vertical([Constraint::Length(9), Constraint::Min(0)]).areas(area);

        self.render_summary(frame, summary_area);

        if self.session.show_review {
            self.render_review(frame, review_area);
        } else {
            let hint = Paragraph::new("Press v to review your answers")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(hint, review_area);
        }
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let score = self.session.score;
        let total = self.session.questions.len();
        let pct = percentage(score, total);
        let color = grade_color(pct);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Quiz complete ")
            .title_bottom(
                Line::from(" v Review  r Retake  n New quiz  q Quit ").centered(),
            )
            .padding(Padding::horizontal(2));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [score_area, gauge_area, message_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(2),
        ])
        .areas(inner);

        let score_line = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{score}/{total}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  on {}", self.session.selected_topic),
                Style::default().fg(Color::Gray),
            ),
        ]));
        frame.render_widget(score_line, score_area);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(f64::from(pct) / 100.0)
            .label(format!("{pct}%"));
        frame.render_widget(gauge, gauge_area);

        let message = Paragraph::new(feedback_message(
            score,
            total,
            &self.session.selected_topic,
        ))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
        frame.render_widget(message, message_area);
    }

    fn render_review(&mut self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        // Reserve one column for the scrollbar
        let content_width = area.width.saturating_sub(1).max(1);
        let lines = review_lines(self.session);

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let total_height = paragraph.line_count(content_width) as u16;

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, total_height));

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Review lines for every question: header with verdict, then each option
/// marked as correct, wrong pick, or plain.
fn review_lines(session: &QuizSession) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, question) in session.questions.iter().enumerate() {
        let answer = session.answers.get(i).copied().flatten();
        let is_correct = answer == Some(question.correct_index);

        let verdict = if is_correct { "✓" } else { "✗" };
        let verdict_color = if is_correct { Color::Green } else { Color::Red };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{verdict} "),
                Style::default()
                    .fg(verdict_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}. {}", i + 1, question.text),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        for (j, option) in question.options.iter().enumerate() {
            let (marker, style) = if j == question.correct_index {
                ("✓", Style::default().fg(Color::Green))
            } else if answer == Some(j) {
                ("✗", Style::default().fg(Color::Red))
            } else {
                (" ", Style::default().fg(Color::DarkGray))
            };
            lines.push(Line::from(Span::styled(
                format!("  {marker} {}. {option}", OPTION_LABELS[j]),
                style,
            )));
        }

        if answer.is_none() {
            lines.push(Line::from(Span::styled(
                "    (not answered)",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        lines.push(Line::from(""));
    }
    lines
}

/// Gauge and score color, aligned with the feedback tiers.
fn grade_color(percentage: u32) -> Color {
    if percentage >= 80 {
        Color::Green
    } else if percentage >= 60 {
        Color::Cyan
    } else if percentage >= 40 {
        Color::Yellow
    } else {
        Color::Red
    }
}
