// Insight client
//
// Sends one analysis request to the configured provider and parses the
// structured reply. Currently supports Gemini only.

use serde::{Deserialize, Serialize};

use matrixlab_config::ai::ResolvedAiConfig;
use matrixlab_config::settings::AiProvider;

use crate::prompt::{build_prompt, InsightSubject};

/// The AI-produced explanation payload. Opaque display data; the only
/// guarantee is that a parsed insight is renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub explanation: String,
    #[serde(rename = "mathDetails")]
    pub math_details: Vec<String>,
}

/// A parsed reply plus any parse warnings.
#[derive(Debug, Clone)]
pub struct InsightReply {
    pub insight: Insight,

    /// Warnings about the response
    pub warnings: Vec<String>,

    /// Raw response text (for debugging)
    pub raw_response: Option<String>,
}

/// Error from an insight request
#[derive(Debug, Clone)]
pub enum InsightError {
    /// Provider not configured
    NotConfigured(String),
    /// Provider not implemented
    NotImplemented(String),
    /// API key missing
    MissingKey,
    /// Network error
    NetworkError(String),
    /// API error response
    ApiError { status: u16, message: String },
    /// Failed to parse response
    ParseError(String),
    /// Provider returned unexpected format
    InvalidResponse(String),
}

impl std::fmt::Display for InsightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightError::NotConfigured(msg) => write!(f, "AI not configured: {}", msg),
            InsightError::NotImplemented(msg) => write!(f, "Provider not implemented: {}", msg),
            InsightError::MissingKey => write!(f, "API key not configured"),
            InsightError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            InsightError::ApiError { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            InsightError::ParseError(msg) => write!(f, "Failed to parse response: {}", msg),
            InsightError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for InsightError {}

// ============================================================================
// Gemini API types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[allow(dead_code)]
    status: Option<String>,
}

/// The reply schema the request pins. Keys must match [`Insight`].
fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "mathDetails": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["title", "explanation", "mathDetails"]
    })
}

// ============================================================================
// Main API
// ============================================================================

/// Request an insight for the given matrix and vectors.
///
/// One request/response round trip with no retry and no timeout.
/// This is a blocking call - run it on a background thread.
pub fn request_insight(
    config: &ResolvedAiConfig,
    subject: &InsightSubject,
) -> Result<InsightReply, InsightError> {
    // Check provider is configured and implemented
    match config.provider {
        AiProvider::None => {
            return Err(InsightError::NotConfigured("AI is disabled".to_string()));
        }
        AiProvider::Gemini => {
            // Continue with Gemini implementation
        }
        AiProvider::OpenAI | AiProvider::Anthropic => {
            return Err(InsightError::NotImplemented(format!(
                "{} provider not yet implemented",
                config.provider.name()
            )));
        }
    }

    // Check API key
    let api_key = config.api_key.as_ref().ok_or(InsightError::MissingKey)?;

    let prompt = build_prompt(subject);

    call_gemini(&config.endpoint, api_key, &config.model, &prompt)
}

fn call_gemini(
    endpoint: &str,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<InsightReply, InsightError> {
    // No client timeout: the request runs until the server answers or the
    // connection drops. Callers own the thread it blocks.
    let client = reqwest::blocking::Client::builder()
        .timeout(None)
        .build()
        .map_err(|e| InsightError::NetworkError(e.to_string()))?;

    let request = GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GeminiGenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    };

    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    );

    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .map_err(|e| InsightError::NetworkError(e.to_string()))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().unwrap_or_default();
        if let Ok(error) = serde_json::from_str::<GeminiError>(&error_text) {
            return Err(InsightError::ApiError {
                status: status.as_u16(),
                message: error.error.message,
            });
        }
        return Err(InsightError::ApiError {
            status: status.as_u16(),
            message: error_text,
        });
    }

    let response_body: GeminiResponse = response
        .json()
        .map_err(|e| InsightError::ParseError(e.to_string()))?;

    let content: String = response_body
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .ok_or_else(|| InsightError::InvalidResponse("No candidates in response".to_string()))?;

    parse_insight(&content)
}

/// Parse the reply text into an [`Insight`].
///
/// The schema pin makes well-behaved replies plain JSON; when a model
/// wraps the object in markdown anyway, the outermost `{...}` is parsed
/// and a warning recorded.
pub fn parse_insight(content: &str) -> Result<InsightReply, InsightError> {
    let mut warnings = Vec::new();

    let parsed: Insight = match serde_json::from_str(content) {
        Ok(p) => p,
        Err(e) => {
            if let Some(json_start) = content.find('{') {
                if let Some(json_end) = content.rfind('}') {
                    let json_str = &content[json_start..=json_end];
                    match serde_json::from_str(json_str) {
                        Ok(p) => {
                            warnings.push("Response contained extra text around JSON".to_string());
                            p
                        }
                        Err(_) => {
                            return Err(InsightError::ParseError(format!(
                                "Failed to parse JSON: {}. Raw: {}",
                                e, content
                            )));
                        }
                    }
                } else {
                    return Err(InsightError::ParseError(format!(
                        "Failed to parse JSON: {}. Raw: {}",
                        e, content
                    )));
                }
            } else {
                return Err(InsightError::ParseError(format!(
                    "Response is not JSON: {}. Raw: {}",
                    e, content
                )));
            }
        }
    };

    Ok(InsightReply {
        insight: Insight {
            title: parsed.title.trim().to_string(),
            explanation: parsed.explanation.trim().to_string(),
            math_details: parsed
                .math_details
                .into_iter()
                .map(|d| d.trim().to_string())
                .collect(),
        },
        warnings,
        raw_response: Some(content.to_string()),
    })
}
