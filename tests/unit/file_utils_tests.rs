/*!
 * Tests for file utility functions and document kinds
 */

use anyhow::Result;
use linerunner::errors::ParsingError;
use linerunner::file_utils::{DocumentKind, FileManager};
use linerunner::script::SourceKind;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_formatted_script(temp_dir.path())?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_writeToFile_nestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("drafts").join("scene.txt");

    FileManager::write_to_file(&nested, "TOM: Hi")?;

    assert_eq!(FileManager::read_to_string(&nested)?, "TOM: Hi");
    Ok(())
}

/// Test document kinds resolved from extensions
#[test]
fn test_fromPath_knownExtensions_shouldResolve() {
    assert_eq!(DocumentKind::from_path("sides.PDF"), Ok(DocumentKind::Pdf));
    assert_eq!(DocumentKind::from_path("draft.docx"), Ok(DocumentKind::Docx));
    assert_eq!(DocumentKind::from_path("scene.txt"), Ok(DocumentKind::Plain));
}

/// Test that unknown extensions are unsupported
#[test]
fn test_fromPath_unknownExtension_shouldFail() {
    assert!(matches!(
        DocumentKind::from_path("scene.rtf"),
        Err(ParsingError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        DocumentKind::from_path("README"),
        Err(ParsingError::UnsupportedFormat(_))
    ));
}

/// Test MIME resolution including parameters
#[test]
fn test_fromMime_shouldIgnoreParameters() {
    assert_eq!(DocumentKind::from_mime("text/plain; charset=utf-8"), Ok(DocumentKind::Plain));
    assert_eq!(DocumentKind::from_mime("application/pdf"), Ok(DocumentKind::Pdf));
    assert_eq!(
        DocumentKind::from_mime("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        Ok(DocumentKind::Docx)
    );
    assert_eq!(
        DocumentKind::from_mime("image/png"),
        Err(ParsingError::UnsupportedFormat("image/png".to_string()))
    );
}

/// Test that a kind detected from a path reports the MIME type it resolves from
#[test]
fn test_mime_fromPath_shouldResolveBack() -> Result<(), ParsingError> {
    let kind = DocumentKind::from_path("sides.docx")?;
    assert_eq!(
        kind.mime(),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(DocumentKind::from_mime(kind.mime()), Ok(kind));
    assert_eq!(DocumentKind::Plain.mime(), "text/plain");
    Ok(())
}

/// Test how each kind is segmented
#[test]
fn test_sourceKind_onlyPlainTextIsFormatted() {
    assert_eq!(DocumentKind::Plain.source_kind(), SourceKind::PlainAlreadyFormatted);
    assert_eq!(DocumentKind::Pdf.source_kind(), SourceKind::Unstructured);
    assert_eq!(DocumentKind::Docx.source_kind(), SourceKind::Unstructured);
}

/// Test that detection requires the file to exist
#[test]
fn test_detectDocumentKind_missingFile_shouldFail() {
    assert!(FileManager::detect_document_kind("does/not/exist.txt").is_err());
}
