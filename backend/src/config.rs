//! Runtime configuration.
//!
//! Values come from the CLI (with environment fallbacks, see `main.rs`) and
//! from `.env` through `dotenvy`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::ai::{GeminiAnalyzer, InvoiceAnalyzer};
use crate::heuristics::RegexAnalyzer;
use crate::ocr::TextractExtractor;
use crate::pipeline::InvoicePipeline;

/// Multipart field carrying the images.
pub const UPLOAD_FIELD: &str = "file";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Largest accepted request body (25 MB).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory with the built frontend (`index.html` + wasm)
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
        }
    }
}

/// Pipeline settings.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// AWS region for Textract; default AWS chain when `None`
    pub aws_region: Option<String>,
    /// Skip Gemini even when a key is configured
    pub force_regex: bool,
}

/// Gemini when `GEMINI_API_KEY` is set, regex rules otherwise.
pub fn select_analyzer(force_regex: bool) -> Arc<dyn InvoiceAnalyzer> {
    if force_regex {
        log::info!("🧩 Using regex analyzer (forced)");
        return Arc::new(RegexAnalyzer);
    }

    match GeminiAnalyzer::from_env() {
        Ok(gemini) => {
            log::info!("🤖 Using Gemini analyzer ({})", gemini.model());
            Arc::new(gemini)
        }
        Err(e) => {
            log::warn!("⚠️  {} - falling back to regex analyzer", e);
            Arc::new(RegexAnalyzer)
        }
    }
}

/// Textract extractor + selected analyzer.
pub async fn build_pipeline(config: &PipelineConfig) -> InvoicePipeline {
    let extractor = TextractExtractor::from_env(config.aws_region.clone()).await;
    InvoicePipeline::new(Arc::new(extractor), select_analyzer(config.force_regex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_regex() {
        assert_eq!(select_analyzer(true).name(), "regex");
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert!(config.static_dir.is_none());
    }
}
