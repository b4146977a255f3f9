//! Document text extractor — turns an uploaded PDF/DOC/DOCX payload into
//! normalized plain text. Extraction is CPU-bound and runs on the blocking
//! worker pool so a large or malformed document cannot stall other requests.

use bytes::Bytes;

use crate::analysis::error::AnalysisError;

/// An uploaded document: immutable byte payload plus the caller-declared
/// content type and original filename. Input only, never mutated.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Docx,
}

/// A single line of normalized text, keeping its index in the original
/// extracted output so structural hints survive normalization.
#[derive(Debug, Clone)]
pub struct Line {
    pub source_index: usize,
    pub text: String,
}

/// Ordered, normalized resume text. Owned exclusively by the pipeline
/// invocation that created it.
#[derive(Debug, Clone, Default)]
pub struct NormalizedText {
    pub lines: Vec<Line>,
    /// Control characters removed during normalization — a structural
    /// anomaly signal for ATS scoring.
    pub stripped_control_chars: usize,
}

impl NormalizedText {
    /// Normalizes already-extracted plain text: strips control characters,
    /// trims line ends, and collapses blank runs by dropping empty lines
    /// while preserving line order and original indices.
    pub fn from_plain(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut stripped = 0usize;

        for (source_index, raw) in text.lines().enumerate() {
            let cleaned: String = raw
                .chars()
                .filter(|c| {
                    let keep = !c.is_control() || *c == '\t';
                    if !keep {
                        stripped += 1;
                    }
                    keep
                })
                .collect();
            let cleaned = cleaned.replace('\t', " ");
            let trimmed = cleaned.trim();
            if trimmed.is_empty() {
                continue;
            }
            lines.push(Line {
                source_index,
                text: trimmed.to_string(),
            });
        }

        NormalizedText {
            lines,
            stripped_control_chars: stripped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The full text re-joined with newlines (keyword matching, prompts).
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&line.text);
        }
        out
    }
}

/// Extracts and normalizes text from an uploaded document on the blocking
/// pool. Fails with `DocumentTooLarge` before any parsing is attempted,
/// `UnsupportedFormat` for unknown types, and `ExtractionFailed` when the
/// parser recovers no text at all.
pub async fn extract_text(
    document: RawDocument,
    max_bytes: usize,
) -> Result<NormalizedText, AnalysisError> {
    if document.bytes.len() > max_bytes {
        return Err(AnalysisError::DocumentTooLarge {
            limit: max_bytes,
            actual: document.bytes.len(),
        });
    }
    let kind = detect_kind(&document)?;

    tokio::task::spawn_blocking(move || extract_sync(&document.bytes, kind))
        .await
        .map_err(|e| AnalysisError::ExtractionFailed(format!("extraction task failed: {e}")))?
}

fn detect_kind(document: &RawDocument) -> Result<DocumentKind, AnalysisError> {
    let declared = document
        .content_type
        .as_deref()
        .unwrap_or("")
        .to_lowercase();
    let extension = document
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match (declared.as_str(), extension.as_str()) {
        ("application/pdf", _) | (_, "pdf") => Ok(DocumentKind::Pdf),
        ("application/vnd.openxmlformats-officedocument.wordprocessingml.document", _)
        | ("application/msword", _)
        | (_, "docx")
        | (_, "doc") => Ok(DocumentKind::Docx),
        _ => Err(AnalysisError::UnsupportedFormat(format!(
            "'{}' is not a PDF, DOC, or DOCX document",
            document.filename
        ))),
    }
}

fn extract_sync(bytes: &[u8], kind: DocumentKind) -> Result<NormalizedText, AnalysisError> {
    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AnalysisError::ExtractionFailed(e.to_string()))?,
        DocumentKind::Docx => extract_docx(bytes)?,
    };

    let normalized = NormalizedText::from_plain(&text);
    if normalized.is_empty() {
        return Err(AnalysisError::ExtractionFailed(
            "no text content recovered (corrupted or image-only document)".to_string(),
        ));
    }
    Ok(normalized)
}

fn extract_docx(bytes: &[u8]) -> Result<String, AnalysisError> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let docx =
        docx_rs::read_docx(bytes).map_err(|e| AnalysisError::ExtractionFailed(e.to_string()))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in docx.document.children.iter() {
        if let DocumentChild::Paragraph(paragraph) = child {
            let text: String = paragraph
                .children
                .iter()
                .filter_map(|pc| match pc {
                    ParagraphChild::Run(run) => Some(
                        run.children
                            .iter()
                            .filter_map(|rc| match rc {
                                RunChild::Text(t) => Some(t.text.clone()),
                                _ => None,
                            })
                            .collect::<Vec<_>>()
                            .join(""),
                    ),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("");
            paragraphs.push(text);
        }
    }
    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(filename: &str, content_type: Option<&str>, payload: &[u8]) -> RawDocument {
        RawDocument {
            bytes: Bytes::copy_from_slice(payload),
            filename: filename.to_string(),
            content_type: content_type.map(String::from),
        }
    }

    #[test]
    fn test_normalize_collapses_blank_runs() {
        let text = NormalizedText::from_plain("a\n\n\n\nb\n\nc");
        let lines: Vec<&str> = text.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_preserves_source_indices() {
        let text = NormalizedText::from_plain("first\n\nthird");
        assert_eq!(text.lines[0].source_index, 0);
        assert_eq!(text.lines[1].source_index, 2);
    }

    #[test]
    fn test_normalize_strips_control_characters() {
        let text = NormalizedText::from_plain("hello\u{0007} world\u{000B}!");
        assert_eq!(text.lines[0].text, "hello world!");
        assert_eq!(text.stripped_control_chars, 2);
    }

    #[test]
    fn test_normalize_whitespace_only_is_empty() {
        assert!(NormalizedText::from_plain("   \n\t\n  ").is_empty());
    }

    #[test]
    fn test_joined_round_trips_line_order() {
        let text = NormalizedText::from_plain("Experience\nBuilt a thing\nSkills");
        assert_eq!(text.joined(), "Experience\nBuilt a thing\nSkills");
    }

    #[tokio::test]
    async fn test_oversized_document_rejected_before_parsing() {
        let document = doc("resume.pdf", Some("application/pdf"), &[0u8; 64]);
        let err = extract_text(document, 32).await.unwrap_err();
        assert!(matches!(err, AnalysisError::DocumentTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_format_rejected() {
        let document = doc("resume.txt", Some("text/plain"), b"plain text");
        let err = extract_text(document, 1024).await.unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_corrupted_pdf_fails_extraction() {
        let document = doc("resume.pdf", Some("application/pdf"), b"not actually a pdf");
        let err = extract_text(document, 1024).await.unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractionFailed(_)));
    }

    #[tokio::test]
    async fn test_extension_fallback_when_mime_missing() {
        let document = doc("resume.pdf", None, b"garbage");
        // Detected as PDF by extension; fails at parse, not at detection.
        let err = extract_text(document, 1024).await.unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractionFailed(_)));
    }
}
