//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.quizmaster/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Models tried in order; replaces the built-in fallback chain entirely.
    pub models: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Fallback chain tried in order until one endpoint yields a valid quiz.
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-2.5-flash",
    "gemini-flash-latest",
    "gemini-2.0-flash",
    "gemini-pro-latest",
];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// None means generation fails fast with a configuration error.
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: Vec<String>,
    pub request_timeout_secs: u64,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.quizmaster/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".quizmaster").join("config.toml"))
}

/// Load config from `~/.quizmaster/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `QuizConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<QuizConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(QuizConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(QuizConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: QuizConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# quizmaster Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# request_timeout_secs = 20          # Per-endpoint request timeout

# [gemini]
# api_key = "AIza..."                # Or set GEMINI_API_KEY env var (.env works too)
# base_url = "https://generativelanguage.googleapis.com/v1beta"
# models = [                         # Tried in order until one succeeds
#     "gemini-2.5-flash",
#     "gemini-flash-latest",
#     "gemini-2.0-flash",
#     "gemini-pro-latest",
# ]
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_model` comes from the `--model` flag (None = not specified); it is
/// promoted to the front of the fallback chain rather than replacing it.
pub fn resolve(config: &QuizConfig, cli_model: Option<&str>) -> ResolvedConfig {
    // API key: env → config (no default, generation checks for absence)
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| config.gemini.api_key.clone());

    // Base URL: env → config → default
    let base_url = std::env::var("GEMINI_BASE_URL")
        .ok()
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    // Model chain: config replaces the default list; CLI prepends to it
    let mut models: Vec<String> = config
        .gemini
        .models
        .clone()
        .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect());
    if let Some(cli_model) = cli_model {
        models.retain(|m| m != cli_model);
        models.insert(0, cli_model.to_string());
    }

    ResolvedConfig {
        api_key,
        base_url,
        models,
        request_timeout_secs: config
            .general
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = QuizConfig::default();
        assert!(config.gemini.api_key.is_none());
        assert!(config.gemini.models.is_none());
        assert!(config.general.request_timeout_secs.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = QuizConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(resolved.models.len(), DEFAULT_MODELS.len());
        assert_eq!(resolved.models[0], "gemini-2.5-flash");
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = QuizConfig {
            general: GeneralConfig {
                request_timeout_secs: Some(5),
            },
            gemini: GeminiConfig {
                api_key: Some("test-key".to_string()),
                base_url: Some("http://localhost:9999".to_string()),
                models: Some(vec!["my-model".to_string()]),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.request_timeout_secs, 5);
        assert_eq!(resolved.base_url, "http://localhost:9999");
        assert_eq!(resolved.models, vec!["my-model".to_string()]);
        assert!(resolved.api_key.is_some());
    }

    #[test]
    fn test_resolve_cli_model_goes_first() {
        let config = QuizConfig::default();
        let resolved = resolve(&config, Some("gemini-exp"));
        assert_eq!(resolved.models[0], "gemini-exp");
        assert_eq!(resolved.models.len(), DEFAULT_MODELS.len() + 1);
    }

    #[test]
    fn test_resolve_cli_model_deduplicates() {
        let config = QuizConfig::default();
        let resolved = resolve(&config, Some("gemini-2.0-flash"));
        assert_eq!(resolved.models[0], "gemini-2.0-flash");
        assert_eq!(resolved.models.len(), DEFAULT_MODELS.len());
        assert_eq!(
            resolved.models.iter().filter(|m| *m == "gemini-2.0-flash").count(),
            1
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
request_timeout_secs = 30

[gemini]
api_key = "AIza-test-123"
base_url = "http://localhost:8080/v1beta"
models = ["gemini-2.5-flash", "gemini-pro-latest"]
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.request_timeout_secs, Some(30));
        assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test-123"));
        assert_eq!(
            config.gemini.models,
            Some(vec![
                "gemini-2.5-flash".to_string(),
                "gemini-pro-latest".to_string()
            ])
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[gemini]
api_key = "AIza-test"
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test"));
        assert!(config.gemini.base_url.is_none());
        assert!(config.gemini.models.is_none());
        assert!(config.general.request_timeout_secs.is_none());
    }
}
