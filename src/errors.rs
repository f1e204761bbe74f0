/*!
 * Error types for the linerunner application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::rehearsal::SessionState;

/// Errors that can occur while turning raw documents into a script
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    /// The segmenter could not recover a single (character, line) pair
    #[error("No valid script content found. Please check the file format.")]
    NoValidContent,

    /// The declared document kind is not one of PDF, DOCX or plain text
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The extraction service could not produce text from the document
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Errors raised by explicit edits to an existing script
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// The edited line does not exist
    #[error("Line {index} is out of range (script has {len} lines)")]
    IndexOutOfRange {
        /// Requested line index
        index: usize,
        /// Number of lines in the script
        len: usize,
    },

    /// Character or text was empty after trimming
    #[error("Script line {0} must not be empty")]
    EmptyField(&'static str),
}

/// Errors reported by the external speech and analysis ports
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortError {
    /// The audio device is missing or refused access
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Playback started but did not finish
    #[error("Playback interrupted: {0}")]
    PlaybackInterrupted(String),

    /// The recognizer reported an error instead of a transcript
    #[error("Speech recognition failed: {0}")]
    RecognitionFailed(String),

    /// The event channel of a capture closed before a final transcript arrived
    #[error("Recognition channel closed before a final transcript")]
    ChannelClosed,

    /// The scene analysis service failed
    #[error("Scene analysis failed: {0}")]
    AnalysisFailed(String),

    /// The request was rejected before reaching the service
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors that can occur while running a rehearsal
///
/// None of these unwind the session: the controller is always left in a
/// well-defined state and the caller may retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RehearsalError {
    /// Capture was requested on a line that belongs to another character
    #[error("It's not your line: line {index} belongs to {character}")]
    NotUsersTurn {
        /// Cursor position at the time of the request
        index: usize,
        /// Owner of the current line
        character: String,
    },

    /// The capture port failed to start or reported an error
    #[error("Speech recognition unavailable: {0}")]
    RecognitionUnavailable(String),

    /// The playback port failed
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Another port request is still outstanding
    #[error("Another request is in progress (state: {0})")]
    PortBusy(SessionState),

    /// The operation is not legal in the current state
    #[error("Operation not allowed in state {0}")]
    InvalidState(SessionState),

    /// A session cannot be created over an empty script
    #[error("Cannot rehearse an empty script")]
    EmptyScript,

    /// The selected role does not speak in the script
    #[error("Role '{0}' has no lines in this script")]
    UnknownRole(String),

    /// A transcript was awaited but no capture is running
    #[error("No capture is active")]
    CaptureNotActive,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document parsing
    #[error("Parsing error: {0}")]
    Parsing(#[from] ParsingError),

    /// Error from a script edit
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from an external port
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// Error from the rehearsal controller
    #[error("Rehearsal error: {0}")]
    Rehearsal(#[from] RehearsalError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
