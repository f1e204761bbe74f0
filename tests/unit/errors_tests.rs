/*!
 * Tests for error types and conversions
 */

use linerunner::errors::{AppError, ParsingError, PortError, RehearsalError, ScriptError};
use linerunner::rehearsal::SessionState;

/// Test the message shown when nothing could be segmented
#[test]
fn test_parsingError_noValidContent_shouldExplain() {
    assert_eq!(
        ParsingError::NoValidContent.to_string(),
        "No valid script content found. Please check the file format."
    );
}

/// Test that rehearsal errors name the state they were raised in
#[test]
fn test_rehearsalError_display_shouldIncludeState() {
    assert_eq!(
        RehearsalError::PortBusy(SessionState::Speaking).to_string(),
        "Another request is in progress (state: speaking)"
    );
    assert_eq!(
        RehearsalError::InvalidState(SessionState::Complete).to_string(),
        "Operation not allowed in state complete"
    );
}

/// Test the off-turn message
#[test]
fn test_rehearsalError_notUsersTurn_shouldNameOwner() {
    let err = RehearsalError::NotUsersTurn {
        index: 2,
        character: "JANE".to_string(),
    };

    assert_eq!(err.to_string(), "It's not your line: line 2 belongs to JANE");
}

/// Test conversion of module errors into the app error
#[test]
fn test_appError_fromModuleErrors_shouldWrap() {
    let parsing: AppError = ParsingError::UnsupportedFormat("rtf".to_string()).into();
    assert!(matches!(parsing, AppError::Parsing(_)));
    assert_eq!(parsing.to_string(), "Parsing error: Unsupported document format: rtf");

    let script: AppError = ScriptError::EmptyField("text").into();
    assert!(matches!(script, AppError::Script(_)));

    let port: AppError = PortError::ChannelClosed.into();
    assert!(matches!(port, AppError::Port(PortError::ChannelClosed)));

    let rehearsal: AppError = RehearsalError::EmptyScript.into();
    assert_eq!(rehearsal.to_string(), "Rehearsal error: Cannot rehearse an empty script");
}

/// Test conversion of io and anyhow errors
#[test]
fn test_appError_fromIoAndAnyhow_shouldConvert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(AppError::from(io), AppError::File(_)));

    let other = AppError::from(anyhow::anyhow!("boom"));
    assert_eq!(other.to_string(), "Unknown error: boom");
}
