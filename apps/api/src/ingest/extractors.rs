//! Binary-format text extractors. Both are blocking and run on the blocking pool.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

/// Bytes in, plain text out. Errors carry a diagnostic reason for the logs;
/// the user-facing message is chosen by the caller.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, String> {
        // pdf-extract panics on some malformed inputs instead of erroring
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| "PDF parser panicked".to_string())?
            .map_err(|e| e.to_string())
    }
}

/// Reads paragraph text from `word/document.xml`. Tabs and line breaks are
/// kept; each paragraph ends with a newline.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| format!("Failed to open DOCX archive: {e}"))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| format!("Missing word/document.xml: {e}"))?
            .read_to_string(&mut xml)
            .map_err(|e| format!("Failed to read document.xml: {e}"))?;

        document_text(&xml)
    }
}

fn document_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| format!("Invalid text in document.xml: {err}"))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>JANE DOE</w:t></w:r></w:p>
    <w:p>
      <w:r><w:t xml:space="preserve">Led a </w:t></w:r>
      <w:r><w:rPr><w:b/></w:rPr><w:t>team</w:t></w:r>
      <w:r><w:tab/><w:t>R&amp;D</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_document_text_paragraphs_and_runs() {
        let text = document_text(BODY).unwrap();
        assert_eq!(text, "JANE DOE\nLed a team\tR&D\n");
    }

    #[test]
    fn test_document_text_ignores_non_text_elements() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:instrText>PAGE</w:instrText></w:r></w:p></w:body></w:document>"#;
        assert_eq!(document_text(xml).unwrap(), "\n");
    }

    #[test]
    fn test_empty_paragraph_is_blank_line() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>A</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>B</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(document_text(xml).unwrap(), "A\n\nB\n");
    }

    #[test]
    fn test_docx_rejects_non_zip() {
        let err = DocxExtractor.extract(b"plain bytes").unwrap_err();
        assert!(err.contains("DOCX archive"));
    }

    #[test]
    fn test_pdf_rejects_garbage() {
        assert!(PdfExtractor.extract(b"%PDF-garbage").is_err());
    }
}
