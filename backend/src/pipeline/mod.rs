//! Per-file invoice pipeline: OCR → normalize → analyze.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use invoice_reader::{InvoicePipeline, RegexAnalyzer, TextractExtractor, UploadedFile};
//!
//! let pipeline = InvoicePipeline::new(
//!     Arc::new(TextractExtractor::from_env(None).await),
//!     Arc::new(RegexAnalyzer),
//! );
//! let outcome = pipeline.process_batch(&files).await;
//! println!("{} invoices read", outcome.entries.len());
//! ```

use std::sync::Arc;

use crate::ai::InvoiceAnalyzer;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{InvoiceEntry, InvoiceInfo};
use crate::ocr::{normalize_text, TextExtractor};

/// An uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Client-side file name
    pub file_name: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Result of processing a batch of uploads.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// One entry per successfully read file, in upload order
    pub entries: Vec<InvoiceEntry>,
    /// Files that produced no entry, with the reason
    pub skipped: Vec<(String, PipelineError)>,
}

/// OCR + analysis for uploaded invoices.
#[derive(Clone)]
pub struct InvoicePipeline {
    extractor: Arc<dyn TextExtractor>,
    analyzer: Arc<dyn InvoiceAnalyzer>,
}

impl InvoicePipeline {
    pub fn new(extractor: Arc<dyn TextExtractor>, analyzer: Arc<dyn InvoiceAnalyzer>) -> Self {
        Self { extractor, analyzer }
    }

    pub fn analyzer_name(&self) -> &'static str {
        self.analyzer.name()
    }

    /// Read one file.
    ///
    /// Analysis failures do not drop the file: its entry carries
    /// [`InvoiceInfo::empty`] instead.
    pub async fn process_file(&self, file: &UploadedFile) -> PipelineResult<InvoiceEntry> {
        if file.file_name.is_empty() {
            return Err(PipelineError::EmptyFileName);
        }

        let text = self
            .extractor
            .extract_text(&file.file_name, &file.bytes)
            .await
            .map_err(|source| PipelineError::Extraction {
                file: file.file_name.clone(),
                source,
            })?;

        let text = normalize_text(&text);
        log::debug!("   {} characters of text in {}", text.len(), file.file_name);

        let info = match self.analyzer.analyze(&text).await {
            Ok(info) => {
                log::info!(
                    "✓ {}: {}/9 fields ({})",
                    file.file_name,
                    info.filled_fields(),
                    self.analyzer.name()
                );
                info
            }
            Err(e) => {
                log::error!("❌ {} analysis failed for {}: {}", self.analyzer.name(), file.file_name, e);
                InvoiceInfo::empty()
            }
        };

        Ok(InvoiceEntry {
            arquivo: file.file_name.clone(),
            informacoes_nota: info,
        })
    }

    /// Read every file in order, skipping the ones that cannot be read.
    pub async fn process_batch(&self, files: &[UploadedFile]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for file in files {
            match self.process_file(file).await {
                Ok(entry) => outcome.entries.push(entry),
                Err(e @ PipelineError::EmptyFileName) => {
                    log::warn!("⚠️  {}", e);
                    outcome.skipped.push((file.file_name.clone(), e));
                }
                Err(e) => {
                    log::error!("❌ {}", e);
                    outcome.skipped.push((file.file_name.clone(), e));
                }
            }
        }

        outcome
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use std::collections::HashMap;

    fn pipeline() -> InvoicePipeline {
        let mut table = HashMap::new();
        table.insert("MERCADO TOTAL 10,00".to_string(), info_with_total("10,00"));
        InvoicePipeline::new(Arc::new(EchoExtractor), Arc::new(TableAnalyzer(table)))
    }

    #[tokio::test]
    async fn test_text_is_normalized_before_analysis() {
        let file = UploadedFile::new("a.png", b"MERCADO\nTOTAL 10,00\n".to_vec());

        let entry = pipeline().process_file(&file).await.unwrap();

        assert_eq!(entry.arquivo, "a.png");
        assert_eq!(entry.informacoes_nota.valor_total.as_deref(), Some("10,00"));
    }

    #[tokio::test]
    async fn test_analysis_failure_yields_empty_info() {
        let file = UploadedFile::new("b.png", b"something else".to_vec());

        let entry = pipeline().process_file(&file).await.unwrap();

        assert_eq!(entry.informacoes_nota, InvoiceInfo::empty());
    }

    #[tokio::test]
    async fn test_batch_skips_unreadable_files_in_order() {
        let files = vec![
            UploadedFile::new("", b"MERCADO TOTAL 10,00".to_vec()),
            UploadedFile::new("fail.png", b"MERCADO TOTAL 10,00".to_vec()),
            UploadedFile::new("blank.png", b"   ".to_vec()),
            UploadedFile::new("ok1.png", b"MERCADO TOTAL 10,00".to_vec()),
            UploadedFile::new("ok2.png", b"other".to_vec()),
        ];

        let outcome = pipeline().process_batch(&files).await;

        let names: Vec<_> = outcome.entries.iter().map(|e| e.arquivo.as_str()).collect();
        assert_eq!(names, vec!["ok1.png", "ok2.png"]);
        assert_eq!(outcome.skipped.len(), 3);
        assert!(matches!(outcome.skipped[0].1, PipelineError::EmptyFileName));
        assert!(matches!(outcome.skipped[1].1, PipelineError::Extraction { .. }));
    }
}
