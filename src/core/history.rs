//! # Score History
//!
//! Append-only record of completed quizzes in `~/.quizmaster/scores.json`.
//!
//! Recording is best-effort: finishing a quiz must never fail because the
//! history file is missing, malformed, or unwritable. Failures are logged
//! and swallowed.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::state::QuizSession;

/// One finished quiz: what was played and how it went.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoreRecord {
    pub topic: String,
    pub score: usize,
    pub total: usize,
    /// Completion time, serialized as an ISO-8601 timestamp.
    pub date: DateTime<Utc>,
}

/// Returns `~/.quizmaster/scores.json`, creating the directory if needed.
pub fn history_path() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".quizmaster");
    fs::create_dir_all(&dir)?;
    Ok(dir.join("scores.json"))
}

/// Load every recorded score. An absent file is an empty history.
pub fn load_history(path: &Path) -> io::Result<Vec<ScoreRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Append one record, preserving everything already on disk.
pub fn append_score(path: &Path, record: ScoreRecord) -> io::Result<()> {
    let mut records = load_history(path)?;
    records.push(record);
    atomic_write_json(path, &records)
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Record a just-completed session. This is the single entry point for
/// history persistence, called from the TUI on the RecordScore effect.
pub fn record_score(session: &QuizSession) {
    let record = ScoreRecord {
        topic: session.selected_topic.clone(),
        score: session.score,
        total: session.questions.len(),
        date: Utc::now(),
    };
    match history_path() {
        Ok(path) => {
            if let Err(e) = append_score(&path, record) {
                warn!("Failed to record score: {}", e);
            } else {
                debug!("Score recorded to {}", path.display());
            }
        }
        Err(e) => warn!("Failed to resolve history path: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record(topic: &str, score: usize) -> ScoreRecord {
        ScoreRecord {
            topic: topic.to_string(),
            score,
            total: 5,
            date: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_load_history_absent_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        assert_eq!(load_history(&path).unwrap(), Vec::new());
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");

        append_score(&path, record("Rust", 4)).unwrap();
        append_score(&path, record("Python", 2)).unwrap();
        append_score(&path, record("Rust", 5)).unwrap();

        let history = load_history(&path).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].topic, "Rust");
        assert_eq!(history[0].score, 4);
        assert_eq!(history[1].topic, "Python");
        assert_eq!(history[2].score, 5);
    }

    #[test]
    fn test_append_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        append_score(&path, record("Rust", 3)).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("scores.tmp").exists());
    }

    #[test]
    fn test_date_serializes_as_iso_8601() {
        let json = serde_json::to_string(&record("Rust", 4)).unwrap();
        assert!(json.contains("2025-06-01T12:00:00Z"));
    }

    #[test]
    fn test_malformed_history_is_invalid_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();
        let err = load_history(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
