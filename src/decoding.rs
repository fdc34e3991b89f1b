// src/decoding.rs
//! Plain-text extraction from uploaded PDF and DOCX files.

use crate::error::DecodeError;
use crate::utils::get_file_extension;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::debug;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Some(Self::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Some(Self::Docx)
        } else {
            None
        }
    }

    /// Prefer the declared content type, fall back to the file extension.
    pub fn detect(mime: Option<&str>, file_name: &str) -> Option<Self> {
        mime.and_then(Self::from_mime)
            .or_else(|| match get_file_extension(file_name).as_deref() {
                Some("pdf") => Some(Self::Pdf),
                Some("docx") => Some(Self::Docx),
                _ => None,
            })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        }
    }
}

/// Decode `bytes` declared as `mime` into trimmed text.
pub fn decode(bytes: &[u8], mime: &str) -> Result<String, DecodeError> {
    let format = DocumentFormat::from_mime(mime)
        .ok_or_else(|| DecodeError::UnsupportedFormat(mime.to_string()))?;
    decode_as(bytes, format)
}

pub fn decode_as(bytes: &[u8], format: DocumentFormat) -> Result<String, DecodeError> {
    let text = match format {
        DocumentFormat::Pdf => extract_text_from_pdf(bytes)?,
        DocumentFormat::Docx => extract_text_from_docx(bytes)?,
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(DecodeError::NoText(format.label()));
    }

    debug!("Decoded {} chars from {} document", text.len(), format.label());
    Ok(text)
}

fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, DecodeError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| DecodeError::Malformed {
        format: "PDF",
        reason: e.to_string(),
    })
}

fn extract_text_from_docx(bytes: &[u8]) -> Result<String, DecodeError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| DecodeError::Malformed {
        format: "DOCX",
        reason: e.to_string(),
    })?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_mime() {
        assert_eq!(DocumentFormat::from_mime("application/pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(
            DocumentFormat::from_mime("application/pdf; charset=binary"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(DocumentFormat::from_mime(DOCX_MIME), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_mime("text/plain"), None);
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(
            DocumentFormat::detect(Some("application/octet-stream"), "cv.DOCX"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::detect(None, "cv.pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::detect(None, "cv.txt"), None);
    }

    #[test]
    fn test_unsupported_format() {
        let err = decode(b"hello", "text/plain").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(mime) if mime == "text/plain"));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = decode(b"definitely not a zip archive", DOCX_MIME).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { format: "DOCX", .. }));
    }

    #[test]
    fn test_garbage_pdf_is_malformed() {
        let err = decode(b"%PDF-1.4 garbage", PDF_MIME).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { format: "PDF", .. }));
    }

    /// Single-page PDF showing `text` in Helvetica, with a correct xref table.
    fn minimal_pdf(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{}\nendstream", stream.len(), stream),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
        }

        let xref_start = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_start
            )
            .as_bytes(),
        );
        pdf
    }

    #[test]
    fn test_pdf_text_is_extracted() {
        let text = decode(&minimal_pdf("Hello PDF"), PDF_MIME).unwrap();
        assert!(text.contains("Hello"), "unexpected text: {:?}", text);
    }

    #[test]
    fn test_docx_round_trip_through_builder() {
        use docx_rs::{Docx, Paragraph, Run};

        let mut buffer = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Rust engineer")))
            .build()
            .pack(&mut buffer)
            .unwrap();

        let text = decode(buffer.get_ref(), DOCX_MIME).unwrap();
        assert_eq!(text, "Jane Doe\nRust engineer");
    }
}
