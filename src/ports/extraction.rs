/*!
 * Text extraction boundary.
 *
 * PDF and DOCX container parsing is done by an external service; only
 * plain text is decoded in-process.
 */

use async_trait::async_trait;
use log::debug;
use std::fmt::Debug;

use crate::errors::ParsingError;
use crate::file_utils::DocumentKind;

/// Turns document bytes into text
#[async_trait]
pub trait TextExtractor: Send + Sync + Debug {
    /// Extract the text of a document
    ///
    /// # Arguments
    /// * `bytes` - Raw document contents
    /// * `kind` - Declared document kind
    async fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ParsingError>;
}

/// Extractor for plain UTF-8 text files
#[derive(Debug, Default, Clone)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ParsingError> {
        match kind {
            DocumentKind::Plain => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| ParsingError::ExtractionFailed(format!("invalid UTF-8: {}", e)))?;
                // Strip a leading byte order mark
                let text = text.strip_prefix('\u{feff}').unwrap_or(text);
                debug!("Extracted {} bytes of plain text", text.len());
                Ok(text.to_string())
            }
            DocumentKind::Pdf | DocumentKind::Docx => Err(ParsingError::UnsupportedFormat(format!(
                "{} documents require an external extraction service",
                kind
            ))),
        }
    }
}
