//! # Loading Component
//!
//! Full-screen spinner shown while question generation is in flight.
//! Stateless: receives the topic, spinner frame, and elapsed seconds as
//! props each draw.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{OPTION_COUNT, QUESTION_COUNT};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Seconds of silence before the "still working" line appears.
const SLOW_GENERATION_SECS: u64 = 5;

pub struct LoadingScreen<'a> {
    topic: &'a str,
    spinner_frame: usize,
    elapsed_secs: u64,
}

impl<'a> LoadingScreen<'a> {
    pub fn new(topic: &'a str, spinner_frame: usize, elapsed_secs: u64) -> Self {
        Self {
            topic,
            spinner_frame,
            elapsed_secs,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{spinner} "),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("Generating questions about {}", self.topic),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!("{QUESTION_COUNT} questions, {OPTION_COUNT} options each"),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if self.elapsed_secs >= SLOW_GENERATION_SECS {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Still working ({}s). Slower models take a while.", self.elapsed_secs),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let text_height = lines.len() as u16;
        let [center] = Layout::vertical([Constraint::Length(text_height)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, center);
    }
}
