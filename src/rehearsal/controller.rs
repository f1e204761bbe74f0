/*!
 * Rehearsal controller.
 *
 * Drives a `RehearsalSession` through the speech ports. The controller
 * suspends at exactly two points: while a line is being spoken, and while
 * waiting for the final transcript of a capture. The cursor only moves after
 * the awaited result has arrived.
 *
 * Dropping a controller future while a line is playing returns the session
 * to `Idle` on that line; `play_current` replays it.
 */

use log::{debug, info, warn};
use std::sync::Arc;

use crate::app_config::{Config, VoiceConfig};
use crate::errors::{PortError, RehearsalError};
use crate::ports::{RecognitionEvent, RecognitionEvents, SpeechRecognizer, SpeechSynthesizer};
use crate::rehearsal::session::{Evaluation, RehearsalSession, SessionState};
use crate::script::ScriptLine;
use crate::similarity::SimilarityScorer;

/// What happened to a captured delivery
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The line counted; the cursor moved on
    Delivered(Evaluation),
    /// The line did not count; capture must be started again
    TryAgain(Evaluation),
    /// The line counted but playing the next line failed; the cursor sits on
    /// that line in `Idle` until `play_current` retries it
    DeliveredPlaybackFailed(Evaluation, String),
}

impl TurnOutcome {
    pub fn evaluation(&self) -> &Evaluation {
        match self {
            Self::Delivered(evaluation)
            | Self::TryAgain(evaluation)
            | Self::DeliveredPlaybackFailed(evaluation, _) => evaluation,
        }
    }

    pub fn is_delivered(&self) -> bool {
        !matches!(self, Self::TryAgain(_))
    }
}

/// Puts an interrupted playback back to `Idle` on the line it was playing
struct PlaybackGuard<'a> {
    session: &'a mut RehearsalSession,
    line: usize,
    armed: bool,
}

impl<'a> PlaybackGuard<'a> {
    fn new(session: &'a mut RehearsalSession, line: usize) -> Self {
        Self {
            session,
            line,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PlaybackGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let reason = PortError::PlaybackInterrupted(format!("line {} was dropped mid-playback", self.line + 1));
            warn!("{}", reason);
            self.session.fail_playback();
        }
    }
}

/// Turn-taking controller for one rehearsal session
#[derive(Debug)]
pub struct RehearsalController<S, R>
where
    S: SpeechSynthesizer,
    R: SpeechRecognizer,
{
    session: RehearsalSession,
    synthesizer: Arc<S>,
    recognizer: Arc<R>,
    scorer: SimilarityScorer,
    voice: VoiceConfig,
    language: String,
    /// Event stream of the running capture
    capture: Option<RecognitionEvents>,
}

impl<S, R> RehearsalController<S, R>
where
    S: SpeechSynthesizer,
    R: SpeechRecognizer,
{
    /// Create a controller with the default voice and threshold
    pub fn new(session: RehearsalSession, synthesizer: Arc<S>, recognizer: Arc<R>) -> Self {
        Self::with_config(session, synthesizer, recognizer, &Config::default())
    }

    /// Create a controller using the voice and rehearsal settings of a config
    pub fn with_config(
        session: RehearsalSession,
        synthesizer: Arc<S>,
        recognizer: Arc<R>,
        config: &Config,
    ) -> Self {
        Self {
            session,
            synthesizer,
            recognizer,
            scorer: SimilarityScorer::new(config.rehearsal.similarity_threshold),
            voice: config.voice.clone(),
            language: config.rehearsal.language.clone(),
            capture: None,
        }
    }

    pub fn session(&self) -> &RehearsalSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn cursor(&self) -> usize {
        self.session.cursor()
    }

    pub fn current_line(&self) -> Option<&ScriptLine> {
        self.session.current_line()
    }

    /// Whether a capture is running and its transcript can be awaited
    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    /// Begin the rehearsal from the first line
    ///
    /// Plays every leading line that belongs to other characters, then
    /// returns in `Idle` (the user's turn) or `Complete`.
    pub async fn start(&mut self) -> Result<SessionState, RehearsalError> {
        match self.session.state() {
            SessionState::Speaking | SessionState::Listening => {
                return Err(RehearsalError::PortBusy(self.session.state()));
            }
            _ => {}
        }

        info!(
            "Starting rehearsal as {} ({} lines)",
            self.session.user_role(),
            self.session.script().len()
        );
        self.session.start();
        self.run_playback().await
    }

    /// Play the current line manually, e.g. after a playback failure
    pub async fn play_current(&mut self) -> Result<SessionState, RehearsalError> {
        self.session.begin_playback()?;
        self.run_playback().await
    }

    /// Start capturing the user's delivery of the current line
    ///
    /// Also re-arms capture after a `TryAgain` outcome.
    pub async fn begin_listening(&mut self) -> Result<(), RehearsalError> {
        if self.capture.is_some() {
            return Err(RehearsalError::PortBusy(SessionState::Listening));
        }
        if self.session.state() != SessionState::Listening {
            self.session.begin_listening()?;
        }

        match self.recognizer.start(&self.language).await {
            Ok(events) => {
                debug!("Listening for line {}", self.session.cursor());
                self.capture = Some(events);
                Ok(())
            }
            Err(e) => {
                warn!("Could not start speech recognition: {}", e);
                self.session.cancel_listening();
                Err(RehearsalError::RecognitionUnavailable(e.to_string()))
            }
        }
    }

    /// Wait for the final transcript of the running capture and score it
    ///
    /// Interim transcripts are logged and skipped. A delivered line advances
    /// the cursor and plays the following lines of other characters; if one
    /// of them fails to play, the outcome is `DeliveredPlaybackFailed`.
    /// Dropping this future while it waits for the transcript leaves the
    /// capture running.
    pub async fn await_transcript(&mut self) -> Result<TurnOutcome, RehearsalError> {
        let transcript = loop {
            let event = match self.capture.as_mut() {
                Some(events) => events.recv().await,
                None => return Err(RehearsalError::CaptureNotActive),
            };

            match event {
                Some(RecognitionEvent::Interim(partial)) => {
                    debug!("Heard so far: {}", partial);
                }
                Some(RecognitionEvent::Final(text)) => {
                    self.capture = None;
                    break text;
                }
                Some(RecognitionEvent::Error(message)) => {
                    return Err(self.fail_capture(message));
                }
                None => {
                    return Err(self.fail_capture(PortError::ChannelClosed.to_string()));
                }
            }
        };

        let evaluation = self.session.evaluate(&transcript, &self.scorer)?;
        if !evaluation.delivered {
            info!(
                "Try again ({:.0}% match). Expected: {:?}, got: {:?}",
                evaluation.score * 100.0,
                evaluation.expected,
                evaluation.transcript
            );
            return Ok(TurnOutcome::TryAgain(evaluation));
        }

        info!("Line delivered ({:.0}% match)", evaluation.score * 100.0);
        match self.run_playback().await {
            Ok(_) => Ok(TurnOutcome::Delivered(evaluation)),
            Err(RehearsalError::PlaybackFailed(reason)) => {
                Ok(TurnOutcome::DeliveredPlaybackFailed(evaluation, reason))
            }
            Err(e) => Err(e),
        }
    }

    /// Cancel the running capture without scoring
    ///
    /// Safe to call at any time; outside `Listening` it does nothing.
    pub async fn stop_listening(&mut self) -> SessionState {
        if self.session.state() != SessionState::Listening {
            return self.session.state();
        }

        self.capture = None;
        if let Err(e) = self.recognizer.stop().await {
            warn!("Speech recognition did not stop cleanly: {}", e);
        }
        self.session.cancel_listening();
        debug!("Capture cancelled at line {}", self.session.cursor());
        self.session.state()
    }

    /// Replace the session, e.g. for a new script or role
    ///
    /// The new session starts in `Idle` at line 0; call `start` to begin.
    pub async fn reset(&mut self, session: RehearsalSession) {
        self.stop_listening().await;
        self.capture = None;
        self.session = session;
        debug!("Session reset for role {}", self.session.user_role());
    }

    /// Speak lines while the session is in `Speaking`
    async fn run_playback(&mut self) -> Result<SessionState, RehearsalError> {
        while self.session.state() == SessionState::Speaking {
            let Some(line) = self.session.current_line().cloned() else {
                break;
            };

            info!("{} (line {})", line.character, line.index + 1);
            let guard = PlaybackGuard::new(&mut self.session, line.index);
            let played = self.synthesizer.speak(&line.text, &self.voice).await;
            guard.disarm();

            match played {
                Ok(()) => self.session.finish_playback(),
                Err(e) => {
                    warn!("Playback of line {} failed: {}", line.index, e);
                    self.session.fail_playback();
                    return Err(RehearsalError::PlaybackFailed(e.to_string()));
                }
            }
        }

        if self.session.is_complete() {
            info!("Scene complete");
        }
        Ok(self.session.state())
    }

    fn fail_capture(&mut self, reason: String) -> RehearsalError {
        warn!("Speech recognition error: {}", reason);
        self.capture = None;
        self.session.cancel_listening();
        RehearsalError::RecognitionUnavailable(reason)
    }
}
