//! Invoice analysis.
//!
//! Turns flattened OCR text into [`InvoiceInfo`]. Two analyzers exist:
//! [`GeminiAnalyzer`] (Google Gemini `generateContent`) and the offline
//! [`RegexAnalyzer`](crate::heuristics::RegexAnalyzer).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use invoice_reader::ai::{GeminiAnalyzer, InvoiceAnalyzer};
//!
//! let analyzer = GeminiAnalyzer::from_env()?;
//! let info = analyzer.analyze("PADARIA BOM PAO LTDA ... TOTAL R$ 25,90").await?;
//! ```

pub mod prompt;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::env;

use crate::error::{AiError, AiResult};
use crate::models::InvoiceInfo;

pub use prompt::invoice_prompt;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

/// Gemini REST base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Reads invoice fields out of OCR text.
#[async_trait]
pub trait InvoiceAnalyzer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn analyze(&self, text: &str) -> AiResult<InvoiceInfo>;
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiAnalyzer {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

/// Gemini `generateContent` response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Gemini API error response
#[derive(Debug, Deserialize)]
struct GeminiError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GeminiAnalyzer {
    /// Create a new client with explicit API key
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from `GEMINI_API_KEY` (and optional `GEMINI_MODEL`)
    pub fn from_env() -> AiResult<Self> {
        let _ = dotenvy::dotenv();

        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| AiError::MissingApiKey("GEMINI_API_KEY not set".to_string()))?;

        let client = Self::new(api_key);
        Ok(match env::var("GEMINI_MODEL") {
            Ok(model) if !model.is_empty() => client.with_model(&model),
            _ => client,
        })
    }

    /// Set the model to use
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Point at another API host
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Call `generateContent` and return the concatenated text parts
    async fn generate(&self, prompt: &str) -> AiResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": { "temperature": 0 }
        });

        log::debug!("📡 Calling Gemini ({})", self.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<GeminiError>(&body) {
                return Err(AiError::ApiError(error.error.message));
            }
            return Err(AiError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let response: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| AiError::InvalidJson(e.to_string()))?;

        let text = response
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(AiError::InvalidJson("Empty response".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl InvoiceAnalyzer for GeminiAnalyzer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn analyze(&self, text: &str) -> AiResult<InvoiceInfo> {
        let answer = self.generate(&invoice_prompt(text)).await?;
        parse_invoice_info(&answer)
    }
}

/// Parse the model answer into invoice fields
pub fn parse_invoice_info(answer: &str) -> AiResult<InvoiceInfo> {
    let json_str = extract_json(answer);
    serde_json::from_str(&json_str).map_err(|e| {
        AiError::InvalidJson(format!(
            "{}. Response was: {}",
            e,
            &answer[..floor_char_boundary(answer, 300)]
        ))
    })
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Extract JSON from a response that may contain markdown code blocks
pub fn extract_json(text: &str) -> String {
    // ```json fenced block
    if let Some(start) = text.find("```json") {
        let body_start = start + "```json".len();
        if let Some(end) = text[body_start..].find("```") {
            return text[body_start..body_start + end].trim().to_string();
        }
    }

    // generic fenced block, language tag skipped
    if let Some(start) = text.find("```") {
        let after_start = start + 3;
        let content_start = text[after_start..]
            .find('\n')
            .map(|i| after_start + i + 1)
            .unwrap_or(after_start);

        if let Some(end) = text[content_start..].find("```") {
            return text[content_start..content_start + end].trim().to_string();
        }
    }

    // raw object
    if let Some(start) = text.find('{') {
        if let Some(end) = text.rfind('}') {
            if start < end {
                return text[start..=end].to_string();
            }
        }
    }

    text.trim().to_string()
}
