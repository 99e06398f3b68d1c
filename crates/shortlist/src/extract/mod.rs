//! Document text extraction — turns uploaded bytes into raw CV text.

use tracing::warn;

/// Declared media type of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Text,
}

impl MediaType {
    /// Maps an upload MIME type to a media type. Anything that is not a PDF
    /// is treated as plain text.
    pub fn from_mime(mime: &str) -> Self {
        if mime.eq_ignore_ascii_case("application/pdf") {
            MediaType::Pdf
        } else {
            MediaType::Text
        }
    }
}

/// One uploaded candidate document. Transient — created per upload and
/// discarded once its text has been extracted.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub content: Vec<u8>,
    pub media_type: MediaType,
}

impl Document {
    pub fn pdf(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
            media_type: MediaType::Pdf,
        }
    }

    pub fn text(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
            media_type: MediaType::Text,
        }
    }
}

/// Extracts the text content of a document.
///
/// PDF extraction failures are converted to a sentinel string rather than an
/// error: the marker flows downstream as if it were genuine CV content, so a
/// corrupt upload scores poorly instead of aborting the batch. A valid PDF
/// with no pages yields an empty string.
pub fn extract_text(document: &Document) -> String {
    match document.media_type {
        MediaType::Pdf => match pdf_extract::extract_text_from_mem(&document.content) {
            Ok(text) => text,
            Err(e) => {
                warn!(filename = %document.filename, error = %e, "PDF extraction failed");
                format!(
                    "[Error extracting PDF content: {e}. Please check if this is a valid PDF file.]"
                )
            }
        },
        MediaType::Text => String::from_utf8_lossy(&document.content).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let doc = Document::text("cv.txt", b"Jane Doe\nRust Engineer".to_vec());
        assert_eq!(extract_text(&doc), "Jane Doe\nRust Engineer");
    }

    #[test]
    fn test_invalid_utf8_degrades_lossily() {
        let doc = Document::text("cv.txt", vec![0x4a, 0x61, 0xff, 0x6e, 0x65]);
        let text = extract_text(&doc);
        assert!(text.starts_with("Ja"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_corrupt_pdf_returns_error_marker() {
        let doc = Document::pdf("cv.pdf", b"this is not a pdf at all".to_vec());
        let text = extract_text(&doc);
        assert!(text.starts_with("[Error extracting PDF content:"));
        assert!(text.ends_with("Please check if this is a valid PDF file.]"));
    }

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(MediaType::from_mime("application/pdf"), MediaType::Pdf);
        assert_eq!(MediaType::from_mime("APPLICATION/PDF"), MediaType::Pdf);
        assert_eq!(MediaType::from_mime("text/plain"), MediaType::Text);
        assert_eq!(MediaType::from_mime("application/msword"), MediaType::Text);
    }
}
