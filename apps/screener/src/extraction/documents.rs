//! Plain-text extraction from uploaded resume files.
//!
//! The filename's extension picks the strategy: `.pdf`, `.docx` or `.txt`.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}. Please upload PDF, DOCX, or TXT.")]
    UnsupportedFileType(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("Could not extract text from file or file is empty.")]
    EmptyText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let lower = filename.trim().to_lowercase();
        if lower.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else if lower.ends_with(".docx") {
            Ok(Self::Docx)
        } else if lower.ends_with(".txt") {
            Ok(Self::Txt)
        } else {
            Err(DocumentError::UnsupportedFileType(filename.to_string()))
        }
    }
}

/// Extracts text from `bytes`, failing if nothing but whitespace comes out.
/// CPU-bound; call from `spawn_blocking` inside async code.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, DocumentError> {
    let text = match DocumentKind::from_filename(filename)? {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Pdf(e.to_string()))?
        }
        DocumentKind::Docx => extract_docx_text(bytes)?,
        DocumentKind::Txt => String::from_utf8_lossy(bytes).into_owned(),
    };

    if text.trim().is_empty() {
        return Err(DocumentError::EmptyText);
    }
    Ok(text)
}

/// Reads `word/document.xml` and emits one line per `w:p` paragraph.
fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| DocumentError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DocumentError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let unescaped = t.unescape().map_err(|e| DocumentError::Docx(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_kind_from_filename_is_case_insensitive() {
        assert_eq!(DocumentKind::from_filename("CV.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_filename("resume.Docx").unwrap(),
            DocumentKind::Docx
        );
        assert_eq!(DocumentKind::from_filename("notes.txt").unwrap(), DocumentKind::Txt);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = extract_text(b"data", "resume.odt").unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFileType(ref f) if f == "resume.odt"));
    }

    #[test]
    fn test_txt_is_decoded_lossily() {
        let text = extract_text(b"Jane Doe\nRust \xff engineer", "cv.txt").unwrap();
        assert!(text.starts_with("Jane Doe\nRust "));
        assert!(text.ends_with(" engineer"));
    }

    #[test]
    fn test_whitespace_only_text_is_empty() {
        let err = extract_text(b"  \n\t ", "cv.txt").unwrap_err();
        assert!(matches!(err, DocumentError::EmptyText));
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Skills: Rust, </w:t></w:r><w:r><w:t>SQL &amp; Python</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = extract_text(&build_docx(xml), "resume.docx").unwrap();
        assert_eq!(text, "Jane Doe\nSkills: Rust, SQL & Python\n");
    }

    #[test]
    fn test_docx_without_text_is_empty() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p/></w:body></w:document>"#;
        let err = extract_text(&build_docx(xml), "resume.docx").unwrap_err();
        assert!(matches!(err, DocumentError::EmptyText));
    }

    #[test]
    fn test_corrupt_docx() {
        let err = extract_text(b"not a zip archive", "resume.docx").unwrap_err();
        assert!(matches!(err, DocumentError::Docx(_)));
    }
}
