//! Uploaded document reading.

use super::models::SuggestError;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

fn is_supported(mime: &str) -> bool {
    mime.starts_with("text/")
        || matches!(mime, "application/msword" | "application/pdf" | DOCX_MIME)
}

/// Reads an uploaded document as text.
///
/// Binary formats are accepted but must still decode as UTF-8; their
/// content is not extracted.
pub fn read_document(content_type: Option<&str>, bytes: &[u8]) -> Result<String, SuggestError> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if !is_supported(&mime) {
        let shown = if mime.is_empty() { "unknown".to_string() } else { mime };
        return Err(SuggestError::UnsupportedFileType(shown));
    }

    let text = std::str::from_utf8(bytes).map_err(|_| SuggestError::UnreadableFile)?;
    if text.trim().is_empty() {
        return Err(SuggestError::EmptyInput);
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_with_charset_is_read() {
        let text = read_document(Some("text/plain; charset=utf-8"), b"Build a deck").unwrap();
        assert_eq!(text, "Build a deck");
    }

    #[test]
    fn office_and_pdf_types_are_accepted() {
        for mime in ["application/msword", DOCX_MIME, "application/pdf", "Text/Markdown"] {
            assert!(read_document(Some(mime), b"plan").is_ok(), "{mime}");
        }
    }

    #[test]
    fn images_are_rejected() {
        assert_eq!(
            read_document(Some("image/png"), b"plan"),
            Err(SuggestError::UnsupportedFileType("image/png".into()))
        );
        assert_eq!(
            read_document(None, b"plan"),
            Err(SuggestError::UnsupportedFileType("unknown".into()))
        );
    }

    #[test]
    fn invalid_utf8_is_unreadable() {
        assert_eq!(
            read_document(Some("application/pdf"), &[0xff, 0xfe, 0x00]),
            Err(SuggestError::UnreadableFile)
        );
    }

    #[test]
    fn blank_upload_is_empty_input() {
        assert_eq!(read_document(Some("text/plain"), b"  \n"), Err(SuggestError::EmptyInput));
    }
}
