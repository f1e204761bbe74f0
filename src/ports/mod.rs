/*!
 * Boundaries to the external services a rehearsal depends on.
 *
 * The speech engines, the document extractor and the scene analyzer are
 * not part of this crate. Each is consumed through a trait here:
 * - `SpeechSynthesizer`: speaks a line and resolves once playback ends
 * - `SpeechRecognizer`: captures one utterance per `start()`
 * - `TextExtractor`: turns document bytes into text (see `extraction`)
 * - `SceneAnalyzer`: produces a prose breakdown of a scene (see `analysis`)
 *
 * `console` provides terminal implementations for the CLI and `mock`
 * provides scripted implementations for tests.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::mpsc;

use crate::app_config::VoiceConfig;
use crate::errors::PortError;

pub mod analysis;
pub mod console;
pub mod extraction;
pub mod mock;

pub use self::analysis::SceneAnalyzer;
pub use self::extraction::{PlainTextExtractor, TextExtractor};

/// An event emitted by a running capture
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// Partial transcript, may be revised
    Interim(String),
    /// Final transcript; ends the capture
    Final(String),
    /// Capture failed; ends the capture
    Error(String),
}

/// Receiving half of a capture's event stream
pub type RecognitionEvents = mpsc::UnboundedReceiver<RecognitionEvent>;

/// Text-to-speech capability
///
/// `speak` must resolve exactly once per call, on completion or on failure.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Speak the text and wait until playback completes
    ///
    /// # Arguments
    /// * `text` - The line to speak
    /// * `voice` - Voice, rate, pitch and volume to use
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), PortError>;
}

/// Speech-to-text capability
///
/// Each `start()` yields zero or more `Interim` events followed by exactly
/// one `Final` or `Error` event.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync + Debug {
    /// Begin capturing one utterance
    ///
    /// # Arguments
    /// * `language` - Recognition language tag, e.g. "en-US"
    ///
    /// # Returns
    /// * `Result<RecognitionEvents, PortError>` - The event stream, or an error if the device is unavailable
    async fn start(&self, language: &str) -> Result<RecognitionEvents, PortError>;

    /// Abort the running capture, if any
    async fn stop(&self) -> Result<(), PortError>;
}
