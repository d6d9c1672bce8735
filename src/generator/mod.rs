//! Content generation: prompts, refusal handling and quiz parsing
//!
//! The model itself sits behind [`GenerativeModel`] so the flow can run
//! against Gemini in production and against canned responses in tests.

pub mod gemini;

use crate::error::{Error, Result};
use crate::quiz::{Quiz, OPTIONS_PER_QUESTION, QUESTION_FIELDS, QUIZ_LENGTH};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub use gemini::GeminiClient;

/// Sentence surfaced when the model declines non-educational content
pub const DISCLAIMER_TEXT: &str =
    "I can only assist with educational content. Please provide a document related to a learning topic.";

/// Substring that marks a refusal in free-text responses
pub const REFUSAL_PHRASE: &str = "I can only assist with educational content";

/// System instruction shared by every request
pub const SYSTEM_INSTRUCTION: &str = "You are an expert educational assistant. Your primary function is to provide clear, accurate, and detailed explanations or quizzes based on the provided text.
You MUST ONLY respond to content that is educational in nature (e.g., science, history, literature, mathematics, technology).
If the provided text or the implied request is not related to an educational topic (e.g., asking for financial advice, generating harmful content, celebrity gossip), you MUST politely decline and state: 'I can only assist with educational content. Please provide a document related to a learning topic.'";

/// Shape the model is asked to answer in
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Free text
    Text,
    /// JSON constrained by a response schema
    Json { schema: serde_json::Value },
}

/// A single call to the model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub format: ResponseFormat,
}

impl GenerationRequest {
    /// Free-text request with the shared system instruction
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: prompt.into(),
            format: ResponseFormat::Text,
        }
    }

    /// Structured request with the shared system instruction
    pub fn json(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: prompt.into(),
            format: ResponseFormat::Json { schema },
        }
    }
}

/// A hosted language model
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send one request and return the raw response text
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

pub fn explain_prompt(text: &str) -> String {
    format!(
        "Based on the following text, provide a detailed but easy-to-understand explanation of the core concepts. Format the output for readability. Text: \"{}\"",
        text
    )
}

pub fn quiz_prompt(text: &str) -> String {
    format!(
        "Based on the following text, generate an engaging multiple-choice quiz with exactly {} questions. Each question must have {} options. Identify the correct answer and provide a brief explanation for why it's correct. Text: \"{}\"",
        QUIZ_LENGTH, OPTIONS_PER_QUESTION, text
    )
}

/// Response schema for quizzes, in the Gemini `responseSchema` dialect
pub fn quiz_response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                },
                "correctAnswer": { "type": "STRING" },
                "explanation": { "type": "STRING" }
            },
            "required": ["question", "options", "correctAnswer", "explanation"]
        }
    })
}

/// Normalize a free-text explanation.
///
/// Any response mentioning the refusal phrase collapses to the exact disclaimer.
/// This is a heuristic: it relies on the model echoing the phrase it was told to use.
pub fn interpret_explanation(raw: &str) -> String {
    let text = raw.trim();
    if text.contains(REFUSAL_PHRASE) {
        DISCLAIMER_TEXT.to_string()
    } else {
        text.to_string()
    }
}

/// Parse a structured quiz response.
///
/// The model may refuse in plain text even when JSON was requested, so anything
/// that does not look like JSON is a disclaimer, never a parse failure.
pub fn interpret_quiz(raw: &str) -> Result<Quiz> {
    let text = raw.trim();
    if !(text.starts_with('{') || text.starts_with('[')) {
        return Err(Error::Disclaimer);
    }

    let malformed = |e: serde_json::Error| {
        Error::generation("quiz", format!("malformed quiz response: {}", e))
    };
    let value: Value = serde_json::from_str(text).map_err(malformed)?;
    for (index, key) in unknown_question_keys(&value) {
        tracing::warn!(index, key, "ignoring unknown quiz field");
    }
    let quiz: Quiz = serde_json::from_value(value).map_err(malformed)?;

    if quiz.len() != QUIZ_LENGTH {
        tracing::warn!(
            questions = quiz.len(),
            expected = QUIZ_LENGTH,
            "model returned unexpected quiz length"
        );
    }
    for (index, question) in quiz.iter().enumerate() {
        if question.options.len() != OPTIONS_PER_QUESTION {
            tracing::warn!(index, options = question.options.len(), "unexpected option count");
        }
        if !question.is_well_formed() {
            tracing::warn!(index, "correct answer is not one of the options");
        }
    }

    Ok(quiz)
}

/// Keys of question objects that the quiz model does not know, in order
fn unknown_question_keys(value: &Value) -> Vec<(usize, &str)> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| item.as_object().map(|fields| (index, fields)))
        .flat_map(|(index, fields)| {
            fields
                .keys()
                .filter(|key| !QUESTION_FIELDS.contains(&key.as_str()))
                .map(move |key| (index, key.as_str()))
        })
        .collect()
}

fn wrap_remote_error(operation: &'static str, err: Error) -> Error {
    match err {
        Error::Generation { reason, .. } => Error::generation(operation, reason),
        Error::Disclaimer => Error::Disclaimer,
        other => Error::generation(operation, other.to_string()),
    }
}

/// Builds prompts, calls the model and interprets the answer
#[derive(Clone)]
pub struct ContentGenerator {
    model: Arc<dyn GenerativeModel>,
}

impl ContentGenerator {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Explain the core concepts of `text`
    pub async fn explain(&self, text: &str) -> Result<String> {
        let request = GenerationRequest::text(explain_prompt(text));
        let raw = self.model.generate(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "explanation request failed");
            wrap_remote_error("explanation", e)
        })?;

        Ok(interpret_explanation(&raw))
    }

    /// Produce a multiple-choice quiz about `text`
    pub async fn generate_quiz(&self, text: &str) -> Result<Quiz> {
        let request = GenerationRequest::json(quiz_prompt(text), quiz_response_schema());
        let raw = self.model.generate(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "quiz request failed");
            wrap_remote_error("quiz", e)
        })?;

        interpret_quiz(&raw).map_err(|e| {
            tracing::warn!(error = %e, "quiz response rejected");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    struct CannedModel {
        reply: std::result::Result<String, String>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl CannedModel {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(reason.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerativeModel for CannedModel {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            self.seen.lock().push(request.clone());
            self.reply
                .clone()
                .map_err(|reason| Error::generation("content", reason))
        }
    }

    const QUIZ_JSON: &str = r#"[
        {"question": "What do plants absorb?", "options": ["CO2", "Gold", "Salt", "Sand"], "correctAnswer": "CO2", "explanation": "Photosynthesis uses CO2."},
        {"question": "Where?", "options": ["Leaves", "Rocks", "Air", "Sea"], "correctAnswer": "Leaves", "explanation": "Chloroplasts."}
    ]"#;

    #[rstest]
    #[case::exact(DISCLAIMER_TEXT)]
    #[case::paraphrased("Sorry! I can only assist with educational content, try another file.")]
    #[case::surrounded("\n  Note: I can only assist with educational content. Bye.  ")]
    fn test_explanation_refusal_is_canonical(#[case] raw: &str) {
        assert_eq!(interpret_explanation(raw), DISCLAIMER_TEXT);
    }

    #[test]
    fn test_explanation_is_trimmed() {
        assert_eq!(
            interpret_explanation("\n  Mitosis splits a cell.  \n"),
            "Mitosis splits a cell."
        );
    }

    #[rstest]
    #[case::plain(DISCLAIMER_TEXT)]
    #[case::other_text("This is about cooking, not learning.")]
    #[case::empty("")]
    #[case::code_fence("```json\n[]\n```")]
    fn test_non_json_quiz_is_disclaimer(#[case] raw: &str) {
        assert!(matches!(interpret_quiz(raw), Err(Error::Disclaimer)));
    }

    #[test]
    fn test_quiz_structure_preserved() {
        let quiz = interpret_quiz(QUIZ_JSON).unwrap();
        let expected: serde_json::Value = serde_json::from_str(QUIZ_JSON).unwrap();
        assert_eq!(serde_json::to_value(&quiz).unwrap(), expected);
    }

    #[test]
    fn test_unknown_question_keys_are_reported() {
        let raw = r#"[
            {"question": "Q1", "options": ["a", "b"], "correctAnswer": "a", "explanation": "e"},
            {"question": "Q2", "options": ["a", "b"], "correctAnswer": "b", "explanation": "e", "difficulty": "easy"}
        ]"#;
        let value: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(unknown_question_keys(&value), vec![(1, "difficulty")]);

        let quiz = interpret_quiz(raw).unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz[1].correct_answer, "b");
    }

    #[test]
    fn test_known_question_keys_are_not_reported() {
        let value: Value = serde_json::from_str(QUIZ_JSON).unwrap();
        assert!(unknown_question_keys(&value).is_empty());
    }

    #[test]
    fn test_malformed_json_is_generation_error() {
        let result = interpret_quiz("[{\"question\": ");
        assert!(matches!(result, Err(Error::Generation { operation: "quiz", .. })));
    }

    #[test]
    fn test_json_object_is_not_a_quiz() {
        let result = interpret_quiz(r#"{"questions": []}"#);
        assert!(matches!(result, Err(Error::Generation { .. })));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = quiz_response_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(
            schema["items"]["required"],
            json!(["question", "options", "correctAnswer", "explanation"])
        );
        assert_eq!(schema["items"]["properties"]["options"]["items"]["type"], "STRING");
    }

    #[test]
    fn test_prompts_embed_text() {
        assert!(explain_prompt("photosynthesis").ends_with("Text: \"photosynthesis\""));
        let prompt = quiz_prompt("photosynthesis");
        assert!(prompt.contains("exactly 5 questions"));
        assert!(prompt.contains("4 options"));
        assert!(prompt.ends_with("Text: \"photosynthesis\""));
    }

    #[tokio::test]
    async fn test_explain_sends_text_request() {
        let model = CannedModel::ok("  Plants make sugar.  ");
        let generator = ContentGenerator::new(model.clone());

        let result = generator.explain("photosynthesis").await.unwrap();
        assert_eq!(result, "Plants make sugar.");

        let seen = model.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(seen[0].format, ResponseFormat::Text);
    }

    #[tokio::test]
    async fn test_quiz_sends_schema() {
        let model = CannedModel::ok(QUIZ_JSON);
        let generator = ContentGenerator::new(model.clone());

        let quiz = generator.generate_quiz("photosynthesis").await.unwrap();
        assert_eq!(quiz.len(), 2);

        let seen = model.seen.lock();
        assert_eq!(
            seen[0].format,
            ResponseFormat::Json {
                schema: quiz_response_schema()
            }
        );
    }

    #[tokio::test]
    async fn test_remote_failure_is_wrapped() {
        let generator = ContentGenerator::new(CannedModel::failing("quota exceeded"));

        let err = generator.explain("x").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to generate explanation from AI model: quota exceeded"
        );

        let err = generator.generate_quiz("x").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to generate quiz from AI model: quota exceeded"
        );
    }

    #[tokio::test]
    async fn test_quiz_refusal_surfaces_disclaimer() {
        let generator = ContentGenerator::new(CannedModel::ok(DISCLAIMER_TEXT));
        let err = generator.generate_quiz("a recipe").await.unwrap_err();
        assert!(matches!(err, Error::Disclaimer));
        assert_eq!(err.client_message(), DISCLAIMER_TEXT);
    }
}
