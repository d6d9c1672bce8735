//! Gemini `generateContent` client

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::generator::{GenerationRequest, GenerativeModel, ResponseFormat};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn request_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    let generation_config = match &request.format {
        ResponseFormat::Text => None,
        ResponseFormat::Json { schema } => Some(GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        }),
    };

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: &request.system_instruction,
            }],
        },
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: &request.prompt,
            }],
        }],
        generation_config,
    }
}

/// Concatenated text of the first candidate
fn response_text(response: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(block) => format!("prompt blocked by the service ({})", block),
            None => "response contained no candidates".to_string(),
        };
        return Err(Error::generation("content", reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let finish = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(Error::generation(
            "content",
            format!("response contained no text (finish reason: {})", finish),
        ));
    }

    Ok(text)
}

/// Describe a non-success HTTP response, preferring the service's own message
fn describe_api_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error.status {
            Some(code) => format!("{} ({}): {}", status, code, parsed.error.message),
            None => format!("{}: {}", status, parsed.error.message),
        },
        Err(_) => format!("service returned {}", status),
    }
}

/// Client for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let endpoint = config
            .api_base
            .join(&format!("v1beta/models/{}:generateContent", config.model))
            .map_err(|e| Error::Configuration {
                reason: format!("Invalid model endpoint: {}", e),
            })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(Error::HttpRequest)?;

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// URL requests are posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        tracing::debug!(
            endpoint = %self.endpoint,
            prompt_chars = request.prompt.len(),
            structured = matches!(request.format, ResponseFormat::Json { .. }),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation("content", describe_api_error(status, &body)));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        response_text(parsed)
    }
}
