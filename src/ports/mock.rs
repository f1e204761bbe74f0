/*!
 * Mock port implementations for testing.
 *
 * These mocks simulate the external engines without audio hardware:
 * - `MockSynthesizer::working()` - Every line plays to completion
 * - `MockSynthesizer::failing()` - Every line fails with a device error
 * - `MockSynthesizer::stall_on_call(n)` - Call n never finishes
 * - `MockRecognizer::with_captures(...)` - Replays queued captures in order
 * - `MockSceneAnalyzer::working()` - Returns a canned breakdown
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::app_config::VoiceConfig;
use crate::errors::PortError;
use crate::ports::analysis::{analysis_prompt, SceneAnalyzer};
use crate::ports::{RecognitionEvent, RecognitionEvents, SpeechRecognizer, SpeechSynthesizer};

/// Behavior mode for the mock synthesizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockSpeechBehavior {
    /// Always plays to completion
    Working,
    /// Always fails with a device error
    Failing,
    /// Fails only on the given call (0-based), succeeds otherwise
    FailOnCall { call: usize },
    /// Never finishes the given call (0-based), succeeds otherwise
    StallOnCall { call: usize },
}

/// Mock synthesizer that records what it was asked to speak
#[derive(Debug)]
pub struct MockSynthesizer {
    behavior: MockSpeechBehavior,
    /// Lines that played to completion
    spoken: Arc<Mutex<Vec<String>>>,
    /// Number of speak calls, successful or not
    call_count: Arc<AtomicUsize>,
}

impl MockSynthesizer {
    pub fn new(behavior: MockSpeechBehavior) -> Self {
        Self {
            behavior,
            spoken: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockSpeechBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockSpeechBehavior::Failing)
    }

    pub fn fail_on_call(call: usize) -> Self {
        Self::new(MockSpeechBehavior::FailOnCall { call })
    }

    pub fn stall_on_call(call: usize) -> Self {
        Self::new(MockSpeechBehavior::StallOnCall { call })
    }

    /// Lines that played to completion, in order
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn speak(&self, text: &str, _voice: &VoiceConfig) -> Result<(), PortError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        let fails = match self.behavior {
            MockSpeechBehavior::Working => false,
            MockSpeechBehavior::Failing => true,
            MockSpeechBehavior::FailOnCall { call: failing } => call == failing,
            MockSpeechBehavior::StallOnCall { call: stalled } => {
                if call == stalled {
                    std::future::pending::<()>().await;
                }
                false
            }
        };
        if fails {
            return Err(PortError::DeviceUnavailable("mock audio device failure".to_string()));
        }

        self.spoken.lock().push(text.to_string());
        Ok(())
    }
}

/// One scripted capture for the mock recognizer
#[derive(Debug, Clone, PartialEq)]
pub enum MockCapture {
    /// Emit the interim transcripts, then the final one
    Transcript { interim: Vec<String>, final_text: String },
    /// Emit an error event
    Error(String),
    /// Fail `start()` itself
    Unavailable,
    /// Keep the capture open without emitting anything until `stop()`
    Silent,
}

impl MockCapture {
    pub fn transcript(text: &str) -> Self {
        Self::Transcript {
            interim: Vec::new(),
            final_text: text.to_string(),
        }
    }
}

/// Mock recognizer that replays queued captures
#[derive(Debug, Default)]
pub struct MockRecognizer {
    captures: Mutex<VecDeque<MockCapture>>,
    /// Sender kept alive for a silent capture
    open_capture: Mutex<Option<mpsc::UnboundedSender<RecognitionEvent>>>,
    start_count: AtomicUsize,
    stop_count: AtomicUsize,
}

impl MockRecognizer {
    /// Create a recognizer that replays the captures in order
    ///
    /// Once the queue is exhausted every capture is silent.
    pub fn with_captures(captures: Vec<MockCapture>) -> Self {
        Self {
            captures: Mutex::new(captures.into()),
            ..Self::default()
        }
    }

    /// Create a recognizer that hears the given transcripts in order
    pub fn with_transcripts(transcripts: &[&str]) -> Self {
        Self::with_captures(transcripts.iter().map(|t| MockCapture::transcript(t)).collect())
    }

    pub fn start_count(&self) -> usize {
        self.start_count.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn start(&self, _language: &str) -> Result<RecognitionEvents, PortError> {
        self.start_count.fetch_add(1, Ordering::SeqCst);
        let capture = self.captures.lock().pop_front().unwrap_or(MockCapture::Silent);

        let (tx, rx) = mpsc::unbounded_channel();
        match capture {
            MockCapture::Transcript { interim, final_text } => {
                for partial in interim {
                    let _ = tx.send(RecognitionEvent::Interim(partial));
                }
                let _ = tx.send(RecognitionEvent::Final(final_text));
            }
            MockCapture::Error(message) => {
                let _ = tx.send(RecognitionEvent::Error(message));
            }
            MockCapture::Unavailable => {
                return Err(PortError::DeviceUnavailable("microphone not available".to_string()));
            }
            MockCapture::Silent => {
                *self.open_capture.lock() = Some(tx);
            }
        }

        Ok(rx)
    }

    async fn stop(&self) -> Result<(), PortError> {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        self.open_capture.lock().take();
        Ok(())
    }
}

/// Behavior mode for the mock scene analyzer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockAnalysisBehavior {
    Working,
    Failing,
}

/// Mock scene analyzer returning a canned breakdown
#[derive(Debug)]
pub struct MockSceneAnalyzer {
    behavior: MockAnalysisBehavior,
    last_prompt: Mutex<Option<String>>,
}

impl MockSceneAnalyzer {
    pub fn working() -> Self {
        Self {
            behavior: MockAnalysisBehavior::Working,
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: MockAnalysisBehavior::Failing,
            last_prompt: Mutex::new(None),
        }
    }

    /// The last prompt that would have been sent to the model
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

#[async_trait]
impl SceneAnalyzer for MockSceneAnalyzer {
    async fn analyze(&self, script_text: &str) -> Result<String, PortError> {
        let prompt = analysis_prompt(script_text)?;
        *self.last_prompt.lock() = Some(prompt);

        match self.behavior {
            MockAnalysisBehavior::Working => Ok("Mock Analysis:\n\n\
                Objective: Connect with the other character\n\
                Emotional arc: Hopeful -> Uncertain -> Empowered\n\
                Tactics: Teasing, questioning, affirming\n\
                Subtext: Testing the waters emotionally."
                .to_string()),
            MockAnalysisBehavior::Failing => {
                Err(PortError::AnalysisFailed("Failed to analyze scene.".to_string()))
            }
        }
    }
}
