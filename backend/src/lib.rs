//! # Invoice Reader - Brazilian invoice (nota fiscal) extraction
//!
//! Reads photos of invoices and returns their fields as JSON.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │   Images    │────▶│     OCR     │────▶│  Analyzer   │────▶│ InvoiceEntry │
//! │ (multipart) │     │ (Textract)  │     │(Gemini/rgx) │     │    (JSON)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_reader::config::{build_pipeline, PipelineConfig};
//! use invoice_reader::UploadedFile;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = build_pipeline(&PipelineConfig::default()).await;
//!     let bytes = std::fs::read("nota.jpg").unwrap();
//!     let outcome = pipeline.process_batch(&[UploadedFile::new("nota.jpg", bytes)]).await;
//!     println!("{}", serde_json::to_string_pretty(&outcome.entries).unwrap());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Invoice fields and API entries
//! - [`ocr`] - Text extraction (AWS Textract)
//! - [`ai`] - Gemini analyzer and the analyzer trait
//! - [`heuristics`] - Regex analyzer
//! - [`pipeline`] - Per-file orchestration
//! - [`config`] - Runtime configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;
pub mod config;

// Extraction
pub mod ocr;
pub mod ai;
pub mod heuristics;
pub mod pipeline;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{AiError, ExtractionError, PipelineError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{InvoiceEntry, InvoiceInfo};

// =============================================================================
// Re-exports - Extraction
// =============================================================================

pub use ocr::{normalize_text, TextExtractor, TextractExtractor};
pub use ai::{GeminiAnalyzer, InvoiceAnalyzer};
pub use heuristics::{extract_invoice_info, RegexAnalyzer};
pub use pipeline::{BatchOutcome, InvoicePipeline, UploadedFile};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::error_response;

// Server
pub mod server {
    pub use crate::api::server::{build_router, start_server, AppState};
}
