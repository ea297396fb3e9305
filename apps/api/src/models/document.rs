use serde::{Deserialize, Serialize};

/// Classification of an uploaded résumé, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Text,
    Pdf,
    Docx,
}

impl DocumentType {
    /// Maps a lowercase extension (without the dot) to a document type.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "txt" => Some(DocumentType::Text),
            "pdf" => Some(DocumentType::Pdf),
            "docx" => Some(DocumentType::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Text => "text",
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
        }
    }
}

/// Plain text pulled out of an upload, ready to be sent for optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    pub name: String,
    pub content: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
}
