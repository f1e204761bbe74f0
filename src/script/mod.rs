/*!
 * Structured scripts and the tools that build them.
 *
 * - `segmenter`: recovers (character, line) pairs from raw text
 * - `cleanup`: ordered cleanup rules for page-scraped text
 * - `roles`: the distinct characters of a script
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;

pub mod cleanup;
pub mod roles;
pub mod segmenter;

pub use self::cleanup::{CleanupPipeline, CleanupRule};
pub use self::roles::{Role, RoleCatalog, RoleEntry};
pub use self::segmenter::{DialogueSegmenter, SourceKind};

/// A single line of dialogue in performance order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    /// Speaking character, trimmed and non-empty
    pub character: String,

    /// Spoken text, trimmed and non-empty
    pub text: String,

    /// Position in the script (0-based)
    pub index: usize,
}

impl fmt::Display for ScriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.character, self.text)
    }
}

/// An ordered sequence of script lines
///
/// Every line has a non-empty character and text, and line indices are
/// always contiguous from 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Script {
    lines: Vec<ScriptLine>,
}

impl Script {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a script from (character, text) pairs, skipping pairs with an
    /// empty side after trimming.
    pub fn from_pairs<I, C, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: AsRef<str>,
        T: AsRef<str>,
    {
        let mut script = Self::new();
        for (character, text) in pairs {
            // Empty pairs are dropped, not reported
            let _ = script.push_line(character.as_ref(), text.as_ref());
        }
        script
    }

    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScriptLine> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScriptLine> {
        self.lines.iter()
    }

    /// Append a line at the end of the script
    pub fn push_line(&mut self, character: &str, text: &str) -> Result<&ScriptLine, ScriptError> {
        let (character, text) = validate_fields(character, text)?;
        let index = self.lines.len();
        self.lines.push(ScriptLine {
            character,
            text,
            index,
        });
        Ok(&self.lines[index])
    }

    /// Replace the character and text of an existing line
    pub fn update_line(&mut self, index: usize, character: &str, text: &str) -> Result<(), ScriptError> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(ScriptError::IndexOutOfRange { index, len })?;
        let (character, text) = validate_fields(character, text)?;
        line.character = character;
        line.text = text;
        Ok(())
    }

    /// Remove a line and re-index the lines after it
    pub fn delete_line(&mut self, index: usize) -> Result<ScriptLine, ScriptError> {
        if index >= self.lines.len() {
            return Err(ScriptError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        let removed = self.lines.remove(index);
        for (i, line) in self.lines.iter_mut().enumerate().skip(index) {
            line.index = i;
        }
        Ok(removed)
    }

    /// Render as `CHARACTER: text` lines
    pub fn to_formatted(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a ScriptLine;
    type IntoIter = std::slice::Iter<'a, ScriptLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

fn validate_fields(character: &str, text: &str) -> Result<(String, String), ScriptError> {
    let character = character.trim();
    let text = text.trim();
    if character.is_empty() {
        return Err(ScriptError::EmptyField("character"));
    }
    if text.is_empty() {
        return Err(ScriptError::EmptyField("text"));
    }
    Ok((character.to_string(), text.to_string()))
}
