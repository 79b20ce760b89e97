//! Gemini wire format and quiz reply parsing.
//!
//! `generateContent` returns free text that should contain a JSON quiz.
//! Models wrap it in code fences or surrounding prose often enough that the
//! parser strips fences and extracts the first balanced `{...}` span before
//! deserializing, then validates the quiz shape strictly.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::state::{OPTION_COUNT, QUESTION_COUNT, Question};
use crate::generation::source::GenerationError;

// ============================================================================
// Gemini generateContent Request Types
// ============================================================================

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize, Debug)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

#[derive(Serialize, Debug)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

impl GenerateContentRequest {
    /// Build a request body with the fixed generation parameters used for
    /// every quiz. Safety thresholds are relaxed to BLOCK_ONLY_HIGH so
    /// legitimate topics (medicine, security) don't get refused.
    pub fn for_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.9,
                max_output_tokens: 2048,
            },
            safety_settings: SAFETY_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: "BLOCK_ONLY_HIGH",
                })
                .collect(),
        }
    }
}

// ============================================================================
// Gemini generateContent Response Types
// ============================================================================

#[derive(Deserialize, Debug)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// The text blob of the first candidate, if the reply carries one.
pub fn response_text(response: &GenerateContentResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .first()?
        .text
        .as_deref()
}

// ============================================================================
// Quiz Reply Parsing
// ============================================================================

/// The quiz shape the prompt demands from the model.
#[derive(Deserialize, Debug)]
struct QuizReply {
    questions: Vec<RawQuestion>,
}

#[derive(Deserialize, Debug)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    // i64 so an out-of-range value fails validation, not deserialization
    #[serde(rename = "correctIndex")]
    correct_index: i64,
}

/// Remove markdown code fence markers, keeping everything between them.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// The first balanced `{...}` span in `text`, brace-matched outside of
/// string literals. Returns None when no object closes.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse and validate a raw model reply into a complete quiz.
///
/// Accepts fenced or prose-wrapped replies. The extracted JSON must hold
/// exactly [`QUESTION_COUNT`] questions, each with [`OPTION_COUNT`] unique
/// options and an in-range correct index. Accepted questions get sequential
/// ids ("1" upward) and trimmed text.
pub fn parse_questions(raw_reply: &str) -> Result<Vec<Question>, GenerationError> {
    let cleaned = strip_code_fences(raw_reply);
    let json = extract_json_span(&cleaned)
        .ok_or_else(|| GenerationError::Parse("no JSON object found in reply".to_string()))?;
    let reply: QuizReply = serde_json::from_str(json)
        .map_err(|e| GenerationError::Parse(format!("malformed quiz JSON: {e}")))?;

    if reply.questions.len() != QUESTION_COUNT {
        return Err(GenerationError::Validation(format!(
            "expected {} questions, got {}",
            QUESTION_COUNT,
            reply.questions.len()
        )));
    }

    let mut questions = Vec::with_capacity(QUESTION_COUNT);
    for (index, raw) in reply.questions.into_iter().enumerate() {
        let number = index + 1;

        if raw.options.len() != OPTION_COUNT {
            return Err(GenerationError::Validation(format!(
                "question {}: expected {} options, got {}",
                number,
                OPTION_COUNT,
                raw.options.len()
            )));
        }

        let options: Vec<String> = raw.options.iter().map(|o| o.trim().to_string()).collect();
        let unique: HashSet<&str> = options.iter().map(String::as_str).collect();
        if unique.len() != OPTION_COUNT {
            return Err(GenerationError::Validation(format!(
                "question {number}: options are not unique"
            )));
        }

        if !(0..OPTION_COUNT as i64).contains(&raw.correct_index) {
            return Err(GenerationError::Validation(format!(
                "question {}: correctIndex {} out of range",
                number, raw.correct_index
            )));
        }

        let text = raw.question.trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::Validation(format!(
                "question {number}: empty question text"
            )));
        }

        questions.push(Question {
            id: number.to_string(),
            text,
            options,
            correct_index: raw.correct_index as usize,
        });
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A syntactically valid five-question quiz with predictable content.
    fn valid_quiz_json() -> String {
        let questions: Vec<String> = (1..=QUESTION_COUNT)
            .map(|n| {
                format!(
                    r#"{{"question": "Question {n}?", "options": ["A{n}", "B{n}", "C{n}", "D{n}"], "correctIndex": {}}}"#,
                    (n - 1) % OPTION_COUNT
                )
            })
            .collect();
        format!(r#"{{"questions": [{}]}}"#, questions.join(", "))
    }

    #[test]
    fn test_parse_plain_json() {
        let questions = parse_questions(&valid_quiz_json()).unwrap();
        assert_eq!(questions.len(), QUESTION_COUNT);
        assert_eq!(questions[0].id, "1");
        assert_eq!(questions[4].id, "5");
        assert_eq!(questions[0].text, "Question 1?");
        assert_eq!(questions[0].correct_index, 0);
        assert_eq!(questions[3].correct_index, 3);
        assert_eq!(questions[4].correct_index, 0);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", valid_quiz_json());
        let questions = parse_questions(&fenced).unwrap();
        assert_eq!(questions.len(), QUESTION_COUNT);
    }

    #[test]
    fn test_parse_fenced_json_without_language_tag() {
        let fenced = format!("```\n{}\n```", valid_quiz_json());
        assert_eq!(parse_questions(&fenced).unwrap().len(), QUESTION_COUNT);
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let wrapped = format!(
            "Here is your quiz:\n\n{}\n\nGood luck with your studies!",
            valid_quiz_json()
        );
        assert_eq!(parse_questions(&wrapped).unwrap().len(), QUESTION_COUNT);
    }

    #[test]
    fn test_parse_trims_question_and_options() {
        let padded = r#"{"questions": [
            {"question": "  Padded?  ", "options": [" a ", " b ", " c ", " d "], "correctIndex": 0},
            {"question": "Q2?", "options": ["a", "b", "c", "d"], "correctIndex": 1},
            {"question": "Q3?", "options": ["a", "b", "c", "d"], "correctIndex": 2},
            {"question": "Q4?", "options": ["a", "b", "c", "d"], "correctIndex": 3},
            {"question": "Q5?", "options": ["a", "b", "c", "d"], "correctIndex": 0}
        ]}"#;
        let questions = parse_questions(padded).unwrap();
        assert_eq!(questions[0].text, "Padded?");
        assert_eq!(questions[0].options, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parse_no_json_at_all() {
        let err = parse_questions("I cannot generate a quiz right now.").unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn test_parse_unbalanced_braces() {
        let err = parse_questions(r#"{"questions": [{"question": "trunc"#).unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_questions(r#"{"questions": [,]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn test_validate_wrong_question_count() {
        let three = r#"{"questions": [
            {"question": "Q1?", "options": ["a", "b", "c", "d"], "correctIndex": 0},
            {"question": "Q2?", "options": ["a", "b", "c", "d"], "correctIndex": 1},
            {"question": "Q3?", "options": ["a", "b", "c", "d"], "correctIndex": 2}
        ]}"#;
        let err = parse_questions(three).unwrap_err();
        match err {
            GenerationError::Validation(msg) => {
                assert!(msg.contains("expected 5 questions, got 3"), "{msg}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_wrong_option_count() {
        let bad = r#"{"questions": [
            {"question": "Q1?", "options": ["a", "b", "c"], "correctIndex": 0},
            {"question": "Q2?", "options": ["a", "b", "c", "d"], "correctIndex": 1},
            {"question": "Q3?", "options": ["a", "b", "c", "d"], "correctIndex": 2},
            {"question": "Q4?", "options": ["a", "b", "c", "d"], "correctIndex": 3},
            {"question": "Q5?", "options": ["a", "b", "c", "d"], "correctIndex": 0}
        ]}"#;
        let err = parse_questions(bad).unwrap_err();
        match err {
            GenerationError::Validation(msg) => assert!(msg.contains("question 1"), "{msg}"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_duplicate_options() {
        let bad = r#"{"questions": [
            {"question": "Q1?", "options": ["same", "same", "c", "d"], "correctIndex": 0},
            {"question": "Q2?", "options": ["a", "b", "c", "d"], "correctIndex": 1},
            {"question": "Q3?", "options": ["a", "b", "c", "d"], "correctIndex": 2},
            {"question": "Q4?", "options": ["a", "b", "c", "d"], "correctIndex": 3},
            {"question": "Q5?", "options": ["a", "b", "c", "d"], "correctIndex": 0}
        ]}"#;
        let err = parse_questions(bad).unwrap_err();
        match err {
            GenerationError::Validation(msg) => assert!(msg.contains("not unique"), "{msg}"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_correct_index_out_of_range() {
        for bad_index in ["-1", "4", "99"] {
            let bad = format!(
                r#"{{"questions": [
                {{"question": "Q1?", "options": ["a", "b", "c", "d"], "correctIndex": {bad_index}}},
                {{"question": "Q2?", "options": ["a", "b", "c", "d"], "correctIndex": 1}},
                {{"question": "Q3?", "options": ["a", "b", "c", "d"], "correctIndex": 2}},
                {{"question": "Q4?", "options": ["a", "b", "c", "d"], "correctIndex": 3}},
                {{"question": "Q5?", "options": ["a", "b", "c", "d"], "correctIndex": 0}}
            ]}}"#
            );
            let err = parse_questions(&bad).unwrap_err();
            assert!(
                matches!(err, GenerationError::Validation(_)),
                "index {bad_index} should fail validation, got {err:?}"
            );
        }
    }

    #[test]
    fn test_extract_json_span_ignores_braces_in_strings() {
        let text = r#"note {"key": "has } brace", "n": 1} tail"#;
        assert_eq!(
            extract_json_span(text),
            Some(r#"{"key": "has } brace", "n": 1}"#)
        );
    }

    #[test]
    fn test_extract_json_span_handles_escaped_quotes() {
        let text = r#"{"key": "quote \" and } inside"}"#;
        assert_eq!(extract_json_span(text), Some(text));
    }

    #[test]
    fn test_extract_json_span_nested_objects() {
        let text = r#"prefix {"outer": {"inner": 1}} suffix"#;
        assert_eq!(extract_json_span(text), Some(r#"{"outer": {"inner": 1}}"#));
    }

    #[test]
    fn test_strip_code_fences_inline() {
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest::for_prompt("make a quiz".to_string());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "make a quiz");
        assert_eq!(json["generationConfig"]["temperature"], 0.7);
        assert_eq!(json["generationConfig"]["topK"], 40);
        assert_eq!(json["generationConfig"]["topP"], 0.9);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(json["safetySettings"][0]["threshold"], "BLOCK_ONLY_HIGH");
    }

    #[test]
    fn test_response_text_navigates_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hello"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response_text(&response), Some("hello"));
    }

    #[test]
    fn test_response_text_missing_pieces() {
        let empty: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(response_text(&empty), None);

        let no_parts: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert_eq!(response_text(&no_parts), None);
    }
}
