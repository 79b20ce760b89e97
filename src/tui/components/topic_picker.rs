//! # Topic Picker Component
//!
//! The first screen: pick one of the predefined topics or type a custom one.
//! Two modes, toggled with Tab: `List` navigates the topic list, `Input`
//! edits the custom topic line.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `TopicPickerState` lives in `TuiState`
//! - `TopicPicker` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::state::QUESTION_COUNT;
use crate::tui::event::TuiEvent;

/// Topics offered out of the box. Anything else goes through the custom
/// input line.
pub const PREDEFINED_TOPICS: [&str; 12] = [
    "JavaScript",
    "React",
    "Python",
    "Machine Learning",
    "Web Development",
    "Team Management",
    "Data Science",
    "Database Design",
    "Mobile Development",
    "Cloud Computing",
    "Cybersecurity",
    "SEO Marketing",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    List,
    Input,
}

/// Events emitted by the topic picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    StartQuiz(String),
    Quit,
}

/// Persistent state for the topic picker screen.
pub struct TopicPickerState {
    pub mode: PickerMode,
    pub selected: usize,
    pub list_state: ListState,
    pub input: String,
    /// Byte offset into `input`; always on a char boundary.
    pub cursor: usize,
}

impl Default for TopicPickerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicPickerState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            mode: PickerMode::List,
            selected: 0,
            list_state,
            input: String::new(),
            cursor: 0,
        }
    }

    /// Handle a key event, returning a PickerEvent if the screen should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<PickerEvent> {
        match self.mode {
            PickerMode::List => self.handle_list_event(event),
            PickerMode::Input => self.handle_input_event(event),
        }
    }

    fn handle_list_event(&mut self, event: &TuiEvent) -> Option<PickerEvent> {
        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => {
                self.selected = (self.selected + 1).min(PREDEFINED_TOPICS.len() - 1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::Submit => Some(PickerEvent::StartQuiz(
                PREDEFINED_TOPICS[self.selected].to_string(),
            )),
            TuiEvent::Tab | TuiEvent::InputChar('/') => {
                self.mode = PickerMode::Input;
                None
            }
            TuiEvent::InputChar('q') | TuiEvent::Escape => Some(PickerEvent::Quit),
            _ => None,
        }
    }

    fn handle_input_event(&mut self, event: &TuiEvent) -> Option<PickerEvent> {
        match event {
            TuiEvent::Escape | TuiEvent::Tab => {
                self.mode = PickerMode::List;
                None
            }
            TuiEvent::Submit => {
                let topic = self.input.trim();
                if topic.is_empty() {
                    None
                } else {
                    Some(PickerEvent::StartQuiz(topic.to_string()))
                }
            }
            TuiEvent::InputChar(c) => {
                self.insert_char(*c);
                None
            }
            TuiEvent::Backspace => {
                self.backspace();
                None
            }
            TuiEvent::CursorLeft => {
                self.move_left();
                None
            }
            TuiEvent::CursorRight => {
                self.move_right();
                None
            }
            _ => None,
        }
    }

    /// Byte offset of the char just before the cursor, if any.
    fn prev_char_start(&self) -> Option<usize> {
        self.input[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) {
        if let Some(i) = self.prev_char_start() {
            self.input.remove(i);
            self.cursor = i;
        }
    }

    fn move_left(&mut self) {
        if let Some(i) = self.prev_char_start() {
            self.cursor = i;
        }
    }

    fn move_right(&mut self) {
        if let Some(c) = self.input[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }
}

/// Transient render wrapper for the topic picker.
pub struct TopicPicker<'a> {
    state: &'a mut TopicPickerState,
}

impl<'a> TopicPicker<'a> {
    pub fn new(state: &'a mut TopicPickerState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        // Centered column so the list doesn't sprawl on wide terminals
        let [column] = Layout::horizontal([Constraint::Max(60)])
            .flex(Flex::Center)
            .areas(area);
        let [header_area, list_area, input_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .areas(column);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "What do you want to be quizzed on?",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{QUESTION_COUNT} AI-generated questions per topic"),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, header_area);

        let help_text = match self.state.mode {
            PickerMode::List => " ↑↓ Select  Enter Start  Tab Custom topic  q Quit ",
            PickerMode::Input => " Enter Start  Esc Back to list ",
        };

        let list_block = Block::default()
            .borders(Borders::ALL)
            .border_style(match self.state.mode {
                PickerMode::List => Style::default().fg(Color::Cyan),
                PickerMode::Input => Style::default().fg(Color::DarkGray),
            })
            .title(" Topics ")
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        let items: Vec<ListItem> = PREDEFINED_TOPICS
            .iter()
            .enumerate()
            .map(|(i, topic)| {
                let style = if i == self.state.selected && self.state.mode == PickerMode::List {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(format!(" {topic} "), style)))
            })
            .collect();
        let list = List::new(items).block(list_block);
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(match self.state.mode {
                PickerMode::Input => Style::default().fg(Color::Cyan),
                PickerMode::List => Style::default().fg(Color::DarkGray),
            })
            .title(" Custom topic ");
        let input_inner = input_block.inner(input_area);
        let input = Paragraph::new(self.state.input.as_str()).block(input_block);
        frame.render_widget(input, input_area);

        if self.state.mode == PickerMode::Input {
            let cursor_x = self.state.input[..self.state.cursor].width() as u16;
            frame.set_cursor_position(Position::new(
                input_inner.x + cursor_x.min(input_inner.width.saturating_sub(1)),
                input_inner.y,
            ));
        }
    }
}
