use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::ParsingError;
use crate::script::SourceKind;

// @module: File and document-kind utilities

const MIME_PDF: &str = "application/pdf";
const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MIME_PLAIN: &str = "text/plain";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Read a file to bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect the document kind of a file from its extension
    pub fn detect_document_kind<P: AsRef<Path>>(path: P) -> Result<DocumentKind> {
        let path = path.as_ref();

        if !Self::file_exists(path) {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        Ok(DocumentKind::from_path(path)?)
    }
}

/// Supported document kinds, resolved once at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Portable Document Format
    Pdf,
    /// Word Open XML document
    Docx,
    /// Plain text
    Plain,
}

impl DocumentKind {
    /// Resolve a declared MIME type
    pub fn from_mime(mime: &str) -> Result<Self, ParsingError> {
        // Ignore parameters such as "; charset=utf-8"
        let essence = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            MIME_PDF => Ok(Self::Pdf),
            MIME_DOCX => Ok(Self::Docx),
            MIME_PLAIN => Ok(Self::Plain),
            _ => Err(ParsingError::UnsupportedFormat(mime.to_string())),
        }
    }

    /// Resolve a file path by its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Plain),
            _ => Err(ParsingError::UnsupportedFormat(format!(
                "{} (supported: PDF, DOCX, TXT)",
                path.display()
            ))),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => MIME_PDF,
            Self::Docx => MIME_DOCX,
            Self::Plain => MIME_PLAIN,
        }
    }

    /// How the segmenter should treat text extracted from this kind
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Self::Plain => SourceKind::PlainAlreadyFormatted,
            Self::Pdf | Self::Docx => SourceKind::Unstructured,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Plain => "plain text",
        };
        f.write_str(name)
    }
}
