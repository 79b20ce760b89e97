//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Intent values.
//!
//! This is the only module that knows about ratatui and crossterm. Core
//! never draws and never reads keys, so a different front end could replace
//! this layer without touching the quiz logic.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (a generation request in flight): draws every ~80ms for
//!   a smooth spinner.
//! - **Idle** (topic list, quiz, results): sleeps up to 500ms, only redraws
//!   on events or terminal resize.

mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::sync::{Arc, mpsc};

use crate::core::action::{Effect, Intent, update};
use crate::core::config::ResolvedConfig;
use crate::core::history;
use crate::core::state::{App, Question};
use crate::generation::{GeminiClient, GenerationError, QuestionSource};
use crate::tui::components::{
    PickerEvent, QuizScreenEvent, QuizScreenState, ResultsScreenEvent, ResultsScreenState,
    TopicPickerState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::Screen;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub topic_picker: TopicPickerState,
    pub quiz: QuizScreenState,
    pub results: ResultsScreenState,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            topic_picker: TopicPickerState::new(),
            quiz: QuizScreenState::new(),
            results: ResultsScreenState::new(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a background generation task, tagged with the topic it was
/// started for so replies from abandoned or superseded requests can be
/// dropped instead of clobbering the current session.
struct GenerationReply {
    topic: String,
    result: Result<Vec<Question>, GenerationError>,
}

/// Build the question source from a resolved config's credentials and endpoints.
pub fn build_source(config: &ResolvedConfig) -> Arc<dyn QuestionSource> {
    Arc::new(GeminiClient::from_config(config))
}

/// Run an intent through the reducer and execute any resulting effect.
fn dispatch(app: &mut App, intent: Intent) {
    let effect = update(&mut app.session, intent);
    if effect == Effect::RecordScore {
        history::record_score(&app.session);
    }
}

/// Kick off question generation for `topic`: set the loading state and spawn
/// the request. Ignored while another generation is already in flight.
fn start_quiz(app: &mut App, topic: String, tx: &mpsc::Sender<GenerationReply>) {
    let topic = topic.trim().to_string();
    if topic.is_empty() {
        return;
    }
    if app.session.is_loading {
        debug!("Ignoring quiz start for '{}': generation already in flight", topic);
        return;
    }
    dispatch(app, Intent::SetTopic(topic.clone()));
    dispatch(app, Intent::SetError(None));
    dispatch(app, Intent::SetLoading(true));
    spawn_generation(app.source.clone(), topic, tx.clone());
}

fn spawn_generation(
    source: Arc<dyn QuestionSource>,
    topic: String,
    tx: mpsc::Sender<GenerationReply>,
) {
    info!("Spawning question generation for '{}'", topic);
    tokio::spawn(async move {
        let result = source.generate(&topic).await;
        let reply = GenerationReply {
            topic: topic.clone(),
            result,
        };
        if tx.send(reply).is_err() {
            warn!(
                "Failed to send generation result for '{}': receiver dropped",
                topic
            );
        }
    });
}

pub fn run(config: ResolvedConfig, initial_topic: Option<String>) -> std::io::Result<()> {
    let source = build_source(&config);
    let mut app = App::new(source);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();

    // Channel for generation results from background tasks
    let (tx, rx) = mpsc::channel();

    // A topic given on the command line skips the picker entirely
    if let Some(topic) = initial_topic {
        start_quiz(&mut app, topic, &tx);
    }

    // Animation timer
    let start_time = std::time::Instant::now();
    // When the in-flight generation started (drives the slow-request hint)
    let mut loading_since: Option<std::time::Instant> = None;
    let mut needs_redraw = true; // Force first frame

    loop {
        if app.session.is_loading {
            if loading_since.is_none() {
                loading_since = Some(std::time::Instant::now());
            }
        } else {
            loading_since = None;
        }

        // The spinner only animates while a generation is in flight
        let animating = app.session.is_loading;
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 12.0) as usize;
            let elapsed_secs = loading_since.map_or(0, |since| since.elapsed().as_secs());
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame, elapsed_secs))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // ForceQuit (Ctrl+C) always quits regardless of screen
            if matches!(event, TuiEvent::ForceQuit) {
                should_quit = true;
                continue;
            }

            match ui::current_screen(&app.session) {
                Screen::Topics => {
                    if let Some(picker_event) = tui.topic_picker.handle_event(&event) {
                        match picker_event {
                            PickerEvent::StartQuiz(topic) => start_quiz(&mut app, topic, &tx),
                            PickerEvent::Quit => should_quit = true,
                        }
                    }
                }
                Screen::Loading => match event {
                    // Esc abandons the generation; the stale-reply guard below
                    // drops its result when it eventually lands
                    TuiEvent::Escape => {
                        dispatch(&mut app, Intent::SetLoading(false));
                        dispatch(&mut app, Intent::ResetQuiz);
                    }
                    TuiEvent::InputChar('q') => should_quit = true,
                    _ => {}
                },
                Screen::Error => match event {
                    TuiEvent::InputChar('r') => {
                        let topic = app.session.selected_topic.clone();
                        dispatch(&mut app, Intent::SetError(None));
                        start_quiz(&mut app, topic, &tx);
                    }
                    TuiEvent::InputChar('t') | TuiEvent::Escape => {
                        dispatch(&mut app, Intent::ResetQuiz);
                    }
                    TuiEvent::InputChar('q') => should_quit = true,
                    _ => {}
                },
                Screen::Quiz => {
                    if let Some(quiz_event) = tui.quiz.handle_event(&event) {
                        match quiz_event {
                            QuizScreenEvent::Answer(option_index) => {
                                dispatch(&mut app, Intent::AnswerQuestion(option_index));
                                // Advance so Enter alone walks the whole quiz
                                if !app.session.is_last_question() {
                                    dispatch(&mut app, Intent::NextQuestion);
                                }
                                tui.quiz.sync_selection(&app.session);
                            }
                            QuizScreenEvent::Next => {
                                dispatch(&mut app, Intent::NextQuestion);
                                tui.quiz.sync_selection(&app.session);
                            }
                            QuizScreenEvent::Previous => {
                                dispatch(&mut app, Intent::PreviousQuestion);
                                tui.quiz.sync_selection(&app.session);
                            }
                            QuizScreenEvent::Complete => {
                                dispatch(&mut app, Intent::CompleteQuiz);
                            }
                            QuizScreenEvent::Quit => should_quit = true,
                        }
                    }
                }
                Screen::Results => {
                    if let Some(results_event) = tui.results.handle_event(&event) {
                        match results_event {
                            ResultsScreenEvent::ToggleReview => {
                                dispatch(&mut app, Intent::ToggleReview);
                            }
                            ResultsScreenEvent::Retake => {
                                dispatch(&mut app, Intent::RetakeQuiz);
                                tui.results = ResultsScreenState::new();
                                tui.quiz.sync_selection(&app.session);
                            }
                            ResultsScreenEvent::NewQuiz => {
                                // A fresh topic run should regenerate, not replay
                                app.source.clear_cache();
                                dispatch(&mut app, Intent::ResetQuiz);
                                tui.results = ResultsScreenState::new();
                            }
                            ResultsScreenEvent::Quit => should_quit = true,
                        }
                    }
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle background generation results
        while let Ok(reply) = rx.try_recv() {
            needs_redraw = true;
            // A reply is stale when the user abandoned the generation or
            // started a different topic while it was in flight
            if !app.session.is_loading || app.session.selected_topic != reply.topic {
                debug!("Dropping stale generation reply for '{}'", reply.topic);
                continue;
            }
            match reply.result {
                Ok(questions) => {
                    info!(
                        "Generation for '{}' produced {} questions",
                        reply.topic,
                        questions.len()
                    );
                    dispatch(&mut app, Intent::SetQuestions(questions));
                    tui.quiz.sync_selection(&app.session);
                }
                Err(e) => {
                    warn!("Generation for '{}' failed: {}", reply.topic, e);
                    dispatch(&mut app, Intent::SetError(Some(e.to_string())));
                }
            }
        }
    }

    ratatui::restore();
    Ok(())
}
