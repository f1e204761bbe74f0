/*!
 * Scene analysis boundary.
 *
 * The analysis itself is performed by an external language model; this
 * module only defines the port and the coaching prompt sent to it.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::PortError;

/// Scripts shorter than this (after trimming) are not worth analyzing
pub const MIN_SCRIPT_CHARS: usize = 10;

/// System instruction for the analysis model
pub const SYSTEM_PROMPT: &str = "You are a professional acting coach and script analyst.";

/// Produces a prose breakdown of a scene for an actor
#[async_trait]
pub trait SceneAnalyzer: Send + Sync + Debug {
    /// Analyze the full script text
    async fn analyze(&self, script_text: &str) -> Result<String, PortError>;
}

/// Build the coaching prompt for a scene
///
/// Fails with `PortError::InvalidInput` when the script is too short.
pub fn analysis_prompt(script_text: &str) -> Result<String, PortError> {
    let script_text = script_text.trim();
    if script_text.chars().count() < MIN_SCRIPT_CHARS {
        return Err(PortError::InvalidInput("Script is too short.".to_string()));
    }

    Ok(format!(
        "You're an acting coach. Analyze the following scene for an actor:\n\n\
         ---\n{}\n---\n\n\
         Return a breakdown including:\n\
         - Character objectives\n\
         - Emotional arc\n\
         - Obstacles\n\
         - Tactics\n\
         - Subtext\n\
         - Suggestions for performance\n",
        script_text
    ))
}
