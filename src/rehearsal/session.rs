/*!
 * Rehearsal session state machine.
 *
 * A session is a script, the role the user plays, a cursor and a state.
 * Transitions are crate-private: only the `RehearsalController` drives them,
 * everyone else reads.
 */

use std::fmt;

use log::debug;

use crate::errors::RehearsalError;
use crate::script::{Role, RoleCatalog, Script, ScriptLine};
use crate::similarity::SimilarityScorer;

/// Where the rehearsal is in the turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the caller (to start capture, or to retry playback)
    Idle,
    /// Playing the current line through the synthesizer
    Speaking,
    /// Capturing the user's delivery of the current line
    Listening,
    /// Scoring a transcript; never observable between calls
    Evaluating,
    /// The cursor has passed the last line
    Complete,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Speaking => "speaking",
            Self::Listening => "listening",
            Self::Evaluating => "evaluating",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// The result of scoring one transcript
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// What the recognizer heard
    pub transcript: String,
    /// The line that was expected
    pub expected: String,
    /// Similarity of the two (0.0-1.0)
    pub score: f64,
    /// Whether the score cleared the threshold
    pub delivered: bool,
}

/// A rehearsal of one script as one role
#[derive(Debug, Clone)]
pub struct RehearsalSession {
    script: Script,
    user_role: Role,
    cursor: usize,
    state: SessionState,
}

impl RehearsalSession {
    /// Create a session over a non-empty script for a role that speaks in it
    pub fn new(script: Script, user_role: impl Into<Role>) -> Result<Self, RehearsalError> {
        let user_role = user_role.into();
        if script.is_empty() {
            return Err(RehearsalError::EmptyScript);
        }
        if !RoleCatalog::from_script(&script).contains(user_role.as_str()) {
            return Err(RehearsalError::UnknownRole(user_role.to_string()));
        }

        Ok(Self {
            script,
            user_role,
            cursor: 0,
            state: SessionState::Idle,
        })
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn user_role(&self) -> &Role {
        &self.user_role
    }

    /// Index of the current line; equals the script length once complete
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_line(&self) -> Option<&ScriptLine> {
        self.script.get(self.cursor)
    }

    /// Whether the current line belongs to the user
    pub fn is_users_turn(&self) -> bool {
        self.current_line()
            .is_some_and(|line| self.user_role.owns(&line.character))
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Lines passed so far and total lines
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.script.len())
    }

    pub(crate) fn start(&mut self) {
        self.cursor = 0;
        self.state = self.state_for_cursor();
        debug!("Session started as {} ({})", self.user_role, self.state);
    }

    pub(crate) fn begin_playback(&mut self) -> Result<(), RehearsalError> {
        match self.state {
            SessionState::Speaking | SessionState::Listening => {
                Err(RehearsalError::PortBusy(self.state))
            }
            SessionState::Idle if !self.is_users_turn() && self.current_line().is_some() => {
                self.state = SessionState::Speaking;
                Ok(())
            }
            state => Err(RehearsalError::InvalidState(state)),
        }
    }

    pub(crate) fn finish_playback(&mut self) {
        if self.state == SessionState::Speaking {
            self.advance();
        }
    }

    pub(crate) fn fail_playback(&mut self) {
        if self.state == SessionState::Speaking {
            self.state = SessionState::Idle;
        }
    }

    pub(crate) fn begin_listening(&mut self) -> Result<(), RehearsalError> {
        match self.state {
            SessionState::Speaking | SessionState::Listening => {
                Err(RehearsalError::PortBusy(self.state))
            }
            SessionState::Idle => match self.current_line() {
                Some(line) if !self.user_role.owns(&line.character) => {
                    Err(RehearsalError::NotUsersTurn {
                        index: self.cursor,
                        character: line.character.clone(),
                    })
                }
                Some(_) => {
                    self.state = SessionState::Listening;
                    Ok(())
                }
                None => Err(RehearsalError::InvalidState(self.state)),
            },
            state => Err(RehearsalError::InvalidState(state)),
        }
    }

    /// Score a final transcript against the current line
    ///
    /// Advances the cursor when delivered, otherwise stays in `Listening`.
    pub(crate) fn evaluate(
        &mut self,
        transcript: &str,
        scorer: &SimilarityScorer,
    ) -> Result<Evaluation, RehearsalError> {
        if self.state != SessionState::Listening {
            return Err(RehearsalError::InvalidState(self.state));
        }
        let expected = match self.current_line() {
            Some(line) => line.text.clone(),
            None => return Err(RehearsalError::InvalidState(self.state)),
        };

        self.state = SessionState::Evaluating;
        let score = scorer.score(transcript, &expected);
        let delivered = scorer.accepts(score);
        debug!("Line {} scored {:.3} (delivered: {})", self.cursor, score, delivered);

        if delivered {
            self.advance();
        } else {
            self.state = SessionState::Listening;
        }

        Ok(Evaluation {
            transcript: transcript.to_string(),
            expected,
            score,
            delivered,
        })
    }

    pub(crate) fn cancel_listening(&mut self) {
        if self.state == SessionState::Listening {
            self.state = SessionState::Idle;
        }
    }

    fn advance(&mut self) {
        self.cursor += 1;
        self.state = self.state_for_cursor();
    }

    fn state_for_cursor(&self) -> SessionState {
        match self.current_line() {
            None => SessionState::Complete,
            Some(line) if self.user_role.owns(&line.character) => SessionState::Idle,
            Some(_) => SessionState::Speaking,
        }
    }
}
