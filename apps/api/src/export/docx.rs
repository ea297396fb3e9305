//! Minimal WordprocessingML writer for the optimized résumé.
//!
//! One paragraph per line of `fullOptimizedResume`. Lines written entirely in
//! capitals are treated as section headings and set in bold.

use std::io::{Cursor, Write};

use chrono::SecondsFormat;
use quick_xml::escape::escape;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::models::optimization::OptimizationResult;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// A finished export: file name plus the archive bytes.
#[derive(Debug, Clone)]
pub struct DocxArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn file_name_for(result: &OptimizationResult) -> String {
    format!("Optimized_Resume_{}.docx", result.id)
}

/// Serializes `result` into a .docx archive. The artifact is never empty.
pub fn export_docx(result: &OptimizationResult) -> Result<DocxArtifact, ExportError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS.as_bytes())?;

    zip.start_file("docProps/core.xml", options)?;
    zip.write_all(core_properties(result).as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(&result.full_optimized_resume).as_bytes())?;

    let bytes = zip.finish()?.into_inner();
    Ok(DocxArtifact {
        file_name: file_name_for(result),
        bytes,
    })
}

fn core_properties(result: &OptimizationResult) -> String {
    let created = result.date.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>Optimized Resume</dc:title>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
            "</cp:coreProperties>"
        ),
        created = created
    )
}

fn document_xml(text: &str) -> String {
    let mut body = String::new();
    for line in text.lines() {
        body.push_str(&paragraph(line));
    }
    if body.is_empty() {
        body.push_str("<w:p/>");
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            "<w:body>{body}</w:body></w:document>"
        ),
        body = body
    )
}

fn paragraph(line: &str) -> String {
    if line.trim().is_empty() {
        return "<w:p/>".to_string();
    }
    let run_props = if is_heading(line) { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(
        r#"<w:p><w:r>{run_props}<w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape(line)
    )
}

/// A line with letters and no lowercase letters, e.g. `PROFESSIONAL EXPERIENCE`.
fn is_heading(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::extractors::{DocxExtractor, TextExtractor};
    use crate::models::optimization::OptimizationPayload;

    fn result(full: &str) -> OptimizationResult {
        OptimizationResult::from_payload(OptimizationPayload {
            initial_score: 40,
            optimized_score: 80,
            analysis: String::new(),
            sections: vec![],
            suggested_keywords: vec![],
            full_optimized_resume: full.to_string(),
        })
    }

    #[test]
    fn test_heading_detection() {
        assert!(is_heading("PROFESSIONAL EXPERIENCE"));
        assert!(is_heading("SKILLS & TOOLS (2024)"));
        assert!(!is_heading("Led a team of 5"));
        assert!(!is_heading("2019 - 2024"));
    }

    #[test]
    fn test_heading_lines_are_bold_and_text_escaped() {
        let xml = document_xml("EXPERIENCE\nBuilt R&D <tools>");
        assert!(xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">EXPERIENCE</w:t>"#));
        assert!(xml.contains("Built R&amp;D &lt;tools&gt;"));
    }

    #[test]
    fn test_file_name_uses_result_id() {
        let result = result("x");
        assert_eq!(
            export_docx(&result).unwrap().file_name,
            format!("Optimized_Resume_{}.docx", result.id)
        );
    }

    #[test]
    fn test_export_reads_back_through_extractor() {
        let full = "JANE DOE\nSenior Engineer\n\nEXPERIENCE\nLed a cross-functional team of 5 engineers";
        let artifact = export_docx(&result(full)).unwrap();
        assert!(!artifact.bytes.is_empty());

        let text = DocxExtractor.extract(&artifact.bytes).unwrap();
        assert_eq!(text.trim(), full);
    }

    #[test]
    fn test_empty_resume_still_produces_document() {
        let artifact = export_docx(&result("")).unwrap();
        assert!(!artifact.bytes.is_empty());
        assert_eq!(DocxExtractor.extract(&artifact.bytes).unwrap().trim(), "");
    }
}
