use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::{ParsingError, RehearsalError};
use crate::file_utils::FileManager;
use crate::ports::analysis::analysis_prompt;
use crate::ports::{PlainTextExtractor, SceneAnalyzer, SpeechRecognizer, SpeechSynthesizer, TextExtractor};
use crate::rehearsal::{RehearsalController, RehearsalSession, SessionState, TurnOutcome};
use crate::script::{DialogueSegmenter, RoleCatalog, Script, SourceKind};

// @module: Application controller for loading scripts and running rehearsals

/// What happened during one terminal rehearsal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RehearsalSummary {
    /// Lines in the script
    pub total_lines: usize,
    /// Cursor position when the rehearsal ended
    pub lines_reached: usize,
    /// Captures started for the user's lines
    pub attempts: usize,
    /// Scores of the delivered lines, in order
    pub delivered_scores: Vec<f64>,
    /// Whether the scene ran to the end
    pub completed: bool,
}

impl RehearsalSummary {
    fn new(total_lines: usize) -> Self {
        Self {
            total_lines,
            ..Self::default()
        }
    }

    pub fn delivered(&self) -> usize {
        self.delivered_scores.len()
    }

    /// Mean score of the delivered lines
    pub fn mean_score(&self) -> Option<f64> {
        if self.delivered_scores.is_empty() {
            return None;
        }
        Some(self.delivered_scores.iter().sum::<f64>() / self.delivered_scores.len() as f64)
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a controller with the default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segmenter configured from the app config
    pub fn segmenter(&self) -> DialogueSegmenter {
        DialogueSegmenter::new(self.config.segmenter.clone())
    }

    /// Segment already extracted text
    pub fn parse_text(&self, text: &str, source: SourceKind) -> Result<Script, ParsingError> {
        self.segmenter().segment(text, source)
    }

    /// Load and segment a script file with the in-process extractor
    ///
    /// # Arguments
    /// * `path` - Script file (.txt, .pdf or .docx)
    /// * `unstructured` - Treat the text as extracted from a PDF/DOCX even if it is plain text
    pub async fn load_script<P: AsRef<Path>>(&self, path: P, unstructured: bool) -> Result<Script> {
        self.load_script_with(path, &PlainTextExtractor, unstructured).await
    }

    /// Load and segment a script file with the given extractor
    pub async fn load_script_with<P, E>(&self, path: P, extractor: &E, unstructured: bool) -> Result<Script>
    where
        P: AsRef<Path>,
        E: TextExtractor,
    {
        let path = path.as_ref();
        let kind = FileManager::detect_document_kind(path)?;
        debug!("Detected {} document ({}): {:?}", kind, kind.mime(), path);

        let bytes = FileManager::read_bytes(path)?;
        let text = extractor
            .extract(&bytes, kind)
            .await
            .with_context(|| format!("Failed to extract text from {:?}", path))?;

        let source = if unstructured {
            SourceKind::Unstructured
        } else {
            kind.source_kind()
        };

        let script = self
            .parse_text(&text, source)
            .with_context(|| format!("Failed to parse script: {:?}", path))?;

        info!("Loaded {} lines from {:?}", script.len(), path);
        Ok(script)
    }

    pub fn role_catalog(&self, script: &Script) -> RoleCatalog {
        RoleCatalog::from_script(script)
    }

    /// The prompt a scene analyzer would receive for this script
    pub fn analysis_prompt(&self, script: &Script) -> Result<String> {
        Ok(analysis_prompt(&script.to_formatted())?)
    }

    /// Run a scene analysis of the whole script
    pub async fn analyze_scene<A: SceneAnalyzer>(&self, script: &Script, analyzer: &A) -> Result<String> {
        analyzer
            .analyze(&script.to_formatted())
            .await
            .context("Scene analysis failed")
    }

    /// Rehearse a script as `role` until the scene completes or capture ends
    ///
    /// Capture is started as soon as it is the user's turn. A recognition
    /// error (e.g. an empty line on the console) ends the rehearsal early.
    pub async fn rehearse<S, R>(
        &self,
        script: Script,
        role: &str,
        synthesizer: Arc<S>,
        recognizer: Arc<R>,
    ) -> Result<RehearsalSummary>
    where
        S: SpeechSynthesizer,
        R: SpeechRecognizer,
    {
        let session = RehearsalSession::new(script, role)?;
        let mut summary = RehearsalSummary::new(session.script().len());
        let mut controller = RehearsalController::with_config(session, synthesizer, recognizer, &self.config);

        let progress_bar = ProgressBar::new(summary.total_lines as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(format!("as {}", role));

        // A line that fails to play is replayed once by the Idle branch below
        let mut state = match controller.start().await {
            Ok(state) => state,
            Err(RehearsalError::PlaybackFailed(reason)) => {
                warn!("Playback failed, retrying: {}", reason);
                controller.state()
            }
            Err(e) => return Err(e).context("Rehearsal could not start"),
        };

        loop {
            let (passed, _) = controller.session().progress();
            progress_bar.set_position(passed as u64);

            match state {
                SessionState::Complete => {
                    summary.completed = true;
                    break;
                }
                SessionState::Idle if !controller.session().is_users_turn() => {
                    state = controller.play_current().await?;
                }
                SessionState::Idle | SessionState::Listening => {
                    if let Some(line) = controller.current_line() {
                        progress_bar.suspend(|| println!("  🎤 {}, your line:", line.character));
                    }

                    match controller.begin_listening().await {
                        Ok(()) => summary.attempts += 1,
                        Err(RehearsalError::RecognitionUnavailable(reason)) => {
                            warn!("Ending rehearsal: {}", reason);
                            break;
                        }
                        Err(e) => return Err(e.into()),
                    }

                    match controller.await_transcript().await {
                        Ok(TurnOutcome::Delivered(evaluation)) => {
                            progress_bar.suspend(|| println!("  ✅ {:.0}% match", evaluation.score * 100.0));
                            summary.delivered_scores.push(evaluation.score);
                        }
                        Ok(TurnOutcome::DeliveredPlaybackFailed(evaluation, reason)) => {
                            progress_bar.suspend(|| println!("  ✅ {:.0}% match", evaluation.score * 100.0));
                            summary.delivered_scores.push(evaluation.score);
                            warn!("Playback failed, retrying: {}", reason);
                        }
                        Ok(TurnOutcome::TryAgain(evaluation)) => {
                            progress_bar.suspend(|| {
                                println!("  🔁 Not quite ({:.0}% match). Try again.", evaluation.score * 100.0)
                            });
                        }
                        Err(RehearsalError::RecognitionUnavailable(reason)) => {
                            warn!("Ending rehearsal: {}", reason);
                            break;
                        }
                        Err(e) => return Err(e.into()),
                    }
                    state = controller.state();
                }
                SessionState::Speaking | SessionState::Evaluating => {
                    return Err(anyhow!("Rehearsal stalled in {} state", state));
                }
            }
        }

        summary.lines_reached = controller.cursor();
        progress_bar.set_position(summary.lines_reached as u64);
        if summary.completed {
            progress_bar.finish_with_message("scene complete");
        } else {
            progress_bar.abandon_with_message("stopped");
        }

        info!(
            "Rehearsal ended at line {}/{} ({} delivered, {} attempts)",
            summary.lines_reached,
            summary.total_lines,
            summary.delivered(),
            summary.attempts
        );
        Ok(summary)
    }
}
