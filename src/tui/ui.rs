//! Screen dispatch and shared drawing helpers.
//!
//! Which screen is showing is derived from the session every frame, never
//! stored: the session fields fully determine it, so the UI can never get
//! out of sync with the quiz state.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::core::state::{App, QuizSession};
use crate::tui::TuiState;
use crate::tui::components::{LoadingScreen, QuizScreen, ResultsScreen, TopicPicker};

/// The five screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Topics,
    Loading,
    Error,
    Quiz,
    Results,
}

/// Derive the active screen. Precedence: an error trumps everything, then
/// loading, then completion, then whether questions are loaded.
pub fn current_screen(session: &QuizSession) -> Screen {
    if session.error.is_some() {
        Screen::Error
    } else if session.is_loading {
        Screen::Loading
    } else if session.quiz_completed {
        Screen::Results
    } else if session.questions.is_empty() {
        Screen::Topics
    } else {
        Screen::Quiz
    }
}

pub fn draw_ui(
    frame: &mut Frame,
    app: &App,
    tui: &mut TuiState,
    spinner_frame: usize,
    elapsed_secs: u64,
) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0)]);
    let [title_area, main_area] = layout.areas(frame.area());

    // Title bar
    let title_text = if app.session.selected_topic.is_empty() {
        format!("quizmaster ({})", app.source.name())
    } else {
        format!(
            "quizmaster ({}) | {}",
            app.source.name(),
            app.session.selected_topic
        )
    };
    frame.render_widget(Span::raw(title_text), title_area);

    match current_screen(&app.session) {
        Screen::Topics => TopicPicker::new(&mut tui.topic_picker).render(frame, main_area),
        Screen::Loading => {
            LoadingScreen::new(&app.session.selected_topic, spinner_frame, elapsed_secs)
                .render(frame, main_area)
        }
        Screen::Error => {
            let message = app.session.error.as_deref().unwrap_or("unknown error");
            draw_error_view(frame, main_area, message);
        }
        Screen::Quiz => QuizScreen::new(&tui.quiz, &app.session).render(frame, main_area),
        Screen::Results => {
            ResultsScreen::new(&mut tui.results, &app.session).render(frame, main_area)
        }
    }
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let error_paragraph = Paragraph::new(error_msg)
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Quiz generation failed ")
                .title_bottom(Line::from(" r Retry  t Topics  q Quit ").centered())
                .padding(Padding::uniform(1)),
        );

    frame.render_widget(error_paragraph, area);
}

/// Compute a centered rect using percentage of the outer rect.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
