//! Error types for the invoice reading pipeline.
//!
//! - [`ExtractionError`] - OCR (text extraction) errors
//! - [`AiError`] - Invoice analysis errors
//! - [`PipelineError`] - Per-file orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Text Extraction Errors
// =============================================================================

/// Errors while reading text out of an image.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The OCR service call failed.
    #[error("OCR request failed: {0}")]
    Service(String),

    /// The image produced no text lines.
    #[error("No text found in image")]
    NoText,
}

// =============================================================================
// Analysis Errors
// =============================================================================

/// Errors from the invoice analyzer.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing API key.
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Error reported by the API.
    #[error("API error: {0}")]
    ApiError(String),

    /// The model answered with something that is not the expected JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),
}

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Reasons a single uploaded file yields no entry.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The multipart part had no file name.
    #[error("Invalid file name")]
    EmptyFileName,

    /// Text extraction failed.
    #[error("Failed to extract text from {file}: {source}")]
    Extraction {
        file: String,
        #[source]
        source: ExtractionError,
    },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Static directory missing.
    #[error("Static directory not found: {0}")]
    StaticDir(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for text extraction.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Result type for analysis.
pub type AiResult<T> = Result<T, AiError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
