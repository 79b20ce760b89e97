//! Gemini-backed question source.
//!
//! One client owns the topic cache and the prioritized model list. Models
//! are tried strictly in order; the first one that yields a valid quiz wins,
//! and the call fails only after every endpoint has been tried.
//!
//! The cache is checked before the API key, so previously generated quizzes
//! keep working even when credentials disappear mid-session.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::core::config::ResolvedConfig;
use crate::core::state::{QUESTION_COUNT, Question};
use crate::generation::parse::{self, GenerateContentRequest, GenerateContentResponse};
use crate::generation::source::{GenerationError, QuestionSource};

pub struct GeminiClient {
    api_key: Option<String>,
    base_url: String,
    models: Vec<String>,
    timeout: Duration,
    client: reqwest::Client,
    cache: Mutex<HashMap<String, Vec<Question>>>,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        models: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key,
            base_url,
            models,
            timeout,
            client: reqwest::Client::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.models.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Cache key: lowercased topic with whitespace runs collapsed to `_`,
    /// so "Rust Programming" and "  rust   programming " share an entry.
    fn cache_key(topic: &str) -> String {
        let normalized = topic
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        format!("quiz_{normalized}")
    }

    fn cached(&self, key: &str) -> Option<Vec<Question>> {
        self.cache.lock().expect("cache mutex poisoned").get(key).cloned()
    }

    fn store(&self, key: String, questions: Vec<Question>) {
        self.cache
            .lock()
            .expect("cache mutex poisoned")
            .insert(key, questions);
    }

    /// One attempt against one model endpoint: request, status check,
    /// response envelope, quiz parsing.
    async fn call_endpoint(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<Vec<Question>, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        debug!("Gemini response status from {}: {}", model, response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error from {}: {} - {}", model, status, message);
            return Err(GenerationError::Api { status, message });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(format!("invalid response body: {e}")))?;
        let text = parse::response_text(&body)
            .ok_or_else(|| GenerationError::Parse("no text candidate in reply".to_string()))?;
        debug!("Raw reply from {}: {} bytes", model, text.len());

        parse::parse_questions(text)
    }
}

#[async_trait]
impl QuestionSource for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, topic: &str) -> Result<Vec<Question>, GenerationError> {
        let key = Self::cache_key(topic);
        if let Some(questions) = self.cached(&key) {
            info!("Serving cached questions for topic '{}'", topic);
            return Ok(questions);
        }

        let api_key = self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            GenerationError::Config(
                "missing Gemini API key; set GEMINI_API_KEY or add it to ~/.quizmaster/config.toml"
                    .to_string(),
            )
        })?;

        info!("Generating questions for topic '{}'", topic);
        let request = GenerateContentRequest::for_prompt(build_prompt(topic));

        let mut last_error = None;
        for (attempt, model) in self.models.iter().enumerate() {
            info!(
                "Trying endpoint {}/{}: {}",
                attempt + 1,
                self.models.len(),
                model
            );
            match self.call_endpoint(model, api_key, &request).await {
                Ok(questions) => {
                    info!("Model {} produced a valid quiz for '{}'", model, topic);
                    self.store(key, questions.clone());
                    return Ok(questions);
                }
                Err(e) => {
                    warn!("Endpoint {} failed: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(GenerationError::Exhausted {
            attempts: self.models.len(),
            last: Box::new(last_error.unwrap_or_else(|| {
                GenerationError::Config("no Gemini models configured".to_string())
            })),
        })
    }

    fn clear_cache(&self) {
        self.cache.lock().expect("cache mutex poisoned").clear();
        debug!("Question cache cleared");
    }
}

/// The quiz-generation prompt. The shape demands are strict so the reply
/// parses mechanically; the count is repeated because models drift on it.
fn build_prompt(topic: &str) -> String {
    format!(
        r#"You are an expert quiz generator. Create exactly {count} multiple-choice questions about "{topic}".

STRICT REQUIREMENTS:
- Generate educational, accurate questions about {topic}
- Each question must have exactly 4 unique options
- Only one option should be correct
- Make questions challenging but fair
- Vary the correct answer positions across questions
- Return ONLY valid JSON, no markdown, no extra text

EXACT JSON FORMAT REQUIRED:
{{
  "questions": [
    {{
      "question": "Your question about {topic}?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctIndex": 0
    }}
  ]
}}

The "questions" array must contain exactly {count} entries. Generate the quiz about: {topic}"#,
        count = QUESTION_COUNT,
        topic = topic
    )
}
