/*!
 * Terminal implementations of the speech ports.
 *
 * Used by the CLI when no speech engine is attached: synthesized lines are
 * printed with a simulated speaking time, and the user's delivery is read
 * from stdin as a single final transcript.
 */

use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app_config::VoiceConfig;
use crate::errors::PortError;
use crate::ports::{RecognitionEvent, RecognitionEvents, SpeechRecognizer, SpeechSynthesizer};

/// Average speaking speed at rate 1.0
const DEFAULT_WORDS_PER_MINUTE: u32 = 160;

/// Prints lines to stdout and waits as long as speaking them would take
#[derive(Debug, Clone)]
pub struct ConsoleSynthesizer {
    words_per_minute: u32,
    simulate_timing: bool,
}

impl Default for ConsoleSynthesizer {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            simulate_timing: true,
        }
    }
}

impl ConsoleSynthesizer {
    /// Create a synthesizer that prints without waiting
    pub fn instant() -> Self {
        Self {
            simulate_timing: false,
            ..Self::default()
        }
    }

    /// Simulated time needed to speak the text at the voice's rate
    pub fn speaking_time(&self, text: &str, voice: &VoiceConfig) -> Duration {
        let words = text.split_whitespace().count() as f64;
        let rate = f64::from(voice.rate.max(0.1));
        let words_per_minute = f64::from(self.words_per_minute.max(1)) * rate;
        Duration::from_secs_f64(words * 60.0 / words_per_minute)
    }
}

#[async_trait]
impl SpeechSynthesizer for ConsoleSynthesizer {
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), PortError> {
        if voice.volume <= 0.0 {
            println!("  (muted) {}", text);
        } else {
            println!("  🔊 {}", text);
        }

        if self.simulate_timing {
            let duration = self.speaking_time(text, voice);
            debug!("Simulating {:?} of playback", duration);
            tokio::time::sleep(duration).await;
        }

        Ok(())
    }
}

/// Reads one line of stdin per capture
#[derive(Debug)]
pub struct ConsoleRecognizer {
    /// Shared so that buffered input survives across captures
    input: Arc<tokio::sync::Mutex<Lines<BufReader<Stdin>>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Default for ConsoleRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleRecognizer {
    pub fn new() -> Self {
        Self {
            input: Arc::new(tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
            pending: Mutex::new(None),
        }
    }
}

/// Map one read from stdin to a recognition event
fn line_event(read: std::io::Result<Option<String>>) -> RecognitionEvent {
    let reason = match read {
        Ok(Some(line)) if !line.trim().is_empty() => return RecognitionEvent::Final(line.trim().to_string()),
        Ok(Some(_)) => "no speech detected".to_string(),
        Ok(None) => "input closed".to_string(),
        Err(e) => e.to_string(),
    };
    RecognitionEvent::Error(PortError::RecognitionFailed(reason).to_string())
}

#[async_trait]
impl SpeechRecognizer for ConsoleRecognizer {
    async fn start(&self, language: &str) -> Result<RecognitionEvents, PortError> {
        debug!("Listening on stdin ({})", language);
        let (tx, rx) = mpsc::unbounded_channel();
        let input = Arc::clone(&self.input);

        let handle = tokio::spawn(async move {
            let mut lines = input.lock().await;
            let _ = tx.send(line_event(lines.next_line().await));
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }

        Ok(rx)
    }

    async fn stop(&self) -> Result<(), PortError> {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
        Ok(())
    }
}
