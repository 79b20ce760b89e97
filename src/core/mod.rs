//! # Core Application Logic
//!
//! This module contains quizmaster's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • QuizSession (data)   │
//!                    │  • Intent (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │   Config   │      │  History   │
//!     │  Adapter   │      │  (toml)    │      │  (scores)  │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `QuizSession` struct, all quiz state in one place
//! - [`action`]: The `Intent` enum, everything that can happen to a session
//! - [`feedback`]: Score → encouragement message
//! - [`history`]: Append-only score log on disk
//! - [`config`]: Settings with defaults → file → env → CLI resolution

pub mod action;
pub mod config;
pub mod feedback;
pub mod history;
pub mod state;
