//! Text extraction from invoice images.
//!
//! [`TextExtractor`] is the seam used by the pipeline; [`TextractExtractor`]
//! calls AWS Textract `DetectDocumentText` on the uploaded bytes.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_textract::error::DisplayErrorContext;
use aws_sdk_textract::primitives::Blob;
use aws_sdk_textract::types::{Block, BlockType, Document};
use aws_sdk_textract::Client as TextractClient;

use crate::error::{ExtractionError, ExtractionResult};

/// Reads the text printed on an image.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Return the text lines of the image joined by `\n`.
    async fn extract_text(&self, file_name: &str, bytes: &[u8]) -> ExtractionResult<String>;
}

/// AWS Textract backed extractor.
#[derive(Clone)]
pub struct TextractExtractor {
    client: TextractClient,
}

impl TextractExtractor {
    pub fn new(client: TextractClient) -> Self {
        Self { client }
    }

    /// Build a client from the AWS default chain, optionally forcing a region.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        Self::new(TextractClient::new(&config))
    }
}

#[async_trait]
impl TextExtractor for TextractExtractor {
    async fn extract_text(&self, file_name: &str, bytes: &[u8]) -> ExtractionResult<String> {
        log::info!("🔍 Textract: {} ({} bytes)", file_name, bytes.len());

        let document = Document::builder().bytes(Blob::new(bytes.to_vec())).build();

        let output = self
            .client
            .detect_document_text()
            .document(document)
            .send()
            .await
            .map_err(|e| ExtractionError::Service(DisplayErrorContext(&e).to_string()))?;

        let text = join_lines(output.blocks());
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }

        Ok(text)
    }
}

/// Concatenate `LINE` blocks, one per line.
fn join_lines(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter(|b| b.block_type() == Some(&BlockType::Line))
        .filter_map(|b| b.text())
        .fold(String::new(), |mut text, line| {
            text.push_str(line);
            text.push('\n');
            text
        })
}

/// Flatten OCR output to a single line for analysis.
pub fn normalize_text(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}
