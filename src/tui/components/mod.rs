//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//! One screen per file; each file co-locates everything for that screen:
//! state types, event types, rendering logic, event handling, and tests.
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `LoadingScreen`: Spinner shown while generation is in flight
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep persistent state in `TuiState` and emit events:
//! - `TopicPickerState`: Topic list plus custom-topic input line
//! - `QuizScreenState`: Option highlight and submit confirmation
//! - `ResultsScreenState`: Review scroll position
//!
//! Stateful screens pair a persistent `XxxState` (lives across frames,
//! handles events) with a transient render wrapper created each draw from
//! borrowed state. Screens never read global state: session data arrives
//! as explicit props, which keeps every screen testable without a terminal.
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── topic_picker.rs   (Topic list + custom input)
//! ├── loading.rs        (Generation spinner)
//! ├── question_card.rs  (One question with A-D options)
//! └── results.rs        (Score summary + answer review)
//! ```

pub mod loading;
pub mod question_card;
pub mod results;
pub mod topic_picker;

pub use loading::LoadingScreen;
pub use question_card::{QuizScreen, QuizScreenEvent, QuizScreenState};
pub use results::{ResultsScreen, ResultsScreenEvent, ResultsScreenState};
pub use topic_picker::{PickerEvent, TopicPicker, TopicPickerState};
