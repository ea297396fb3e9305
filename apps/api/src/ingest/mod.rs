//! Document ingestion: classify an upload by extension and pull out plain text.

pub mod extractors;
pub mod handlers;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::ingest::extractors::{DocxExtractor, PdfExtractor, TextExtractor};
use crate::models::document::{DocumentType, FileData};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("The file format .{0} is not supported. Please upload a .txt, .pdf, or .docx file.")]
    UnsupportedFormat(String),

    #[error("{}", extraction_message(.0))]
    ExtractionFailed(DocumentType),

    #[error("{}", empty_message(.0))]
    EmptyDocument(DocumentType),
}

fn extraction_message(doc_type: &DocumentType) -> &'static str {
    match doc_type {
        DocumentType::Text => "Failed to read the text file content.",
        DocumentType::Pdf => "Failed to extract text from PDF. Please ensure it's not password protected or try converting to .txt.",
        DocumentType::Docx => "Failed to extract text from DOCX. Please ensure the file is not corrupted or try converting to .txt.",
    }
}

fn empty_message(doc_type: &DocumentType) -> &'static str {
    match doc_type {
        DocumentType::Text => "The text file appears to be empty.",
        DocumentType::Pdf => "The PDF appears to be empty or contains only images (no selectable text).",
        DocumentType::Docx => "The DOCX document appears to be empty.",
    }
}

/// Classifies a file name by its last extension, case-insensitively.
/// Fails before any content is looked at.
pub fn classify(file_name: &str) -> Result<DocumentType, IngestError> {
    // Without a dot the whole name is reported as the extension.
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or(file_name)
        .to_lowercase();
    DocumentType::from_extension(&extension).ok_or(IngestError::UnsupportedFormat(extension))
}

/// Holds the extractors used for binary formats.
#[derive(Clone)]
pub struct DocumentParser {
    pdf: Arc<dyn TextExtractor>,
    docx: Arc<dyn TextExtractor>,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new(Arc::new(PdfExtractor), Arc::new(DocxExtractor))
    }
}

impl DocumentParser {
    pub fn new(pdf: Arc<dyn TextExtractor>, docx: Arc<dyn TextExtractor>) -> Self {
        Self { pdf, docx }
    }

    /// Turns an upload into `FileData`.
    ///
    /// Plain text is decoded as UTF-8 (lossy) and kept verbatim; extracted
    /// PDF/DOCX text is trimmed. Whitespace-only output from any format is
    /// `EmptyDocument`, distinct from an extractor failure.
    pub async fn parse(&self, file_name: &str, bytes: Vec<u8>) -> Result<FileData, IngestError> {
        let doc_type = classify(file_name)?;

        let content = match doc_type {
            DocumentType::Text => String::from_utf8_lossy(&bytes).into_owned(),
            DocumentType::Pdf => self.extract(Arc::clone(&self.pdf), doc_type, bytes).await?,
            DocumentType::Docx => self.extract(Arc::clone(&self.docx), doc_type, bytes).await?,
        };

        if content.trim().is_empty() {
            return Err(IngestError::EmptyDocument(doc_type));
        }

        info!(
            "Parsed {} upload '{}' ({} chars)",
            doc_type.as_str(),
            file_name,
            content.chars().count()
        );

        Ok(FileData {
            name: file_name.to_string(),
            content,
            doc_type,
        })
    }

    async fn extract(
        &self,
        extractor: Arc<dyn TextExtractor>,
        doc_type: DocumentType,
        bytes: Vec<u8>,
    ) -> Result<String, IngestError> {
        let outcome = tokio::task::spawn_blocking(move || extractor.extract(&bytes)).await;
        match outcome {
            Ok(Ok(text)) => Ok(text.trim().to_string()),
            Ok(Err(reason)) => {
                warn!("{} extraction failed: {reason}", doc_type.as_str());
                Err(IngestError::ExtractionFailed(doc_type))
            }
            Err(join_err) => {
                warn!("{} extraction task aborted: {join_err}", doc_type.as_str());
                Err(IngestError::ExtractionFailed(doc_type))
            }
        }
    }
}
