/*!
 * Dialogue segmentation.
 *
 * Turns raw extracted text into a `Script`. Two strategies are used:
 * - a fast path for text already in `CHARACTER: line` form
 * - a heuristic path for screenplay-style layouts, where an uppercase cue
 *   line is paired with the next line of mixed-case dialogue
 */

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::app_config::SegmenterConfig;
use crate::errors::ParsingError;
use crate::script::cleanup::CleanupPipeline;
use crate::script::Script;

/// Pattern for an already formatted line: an uppercase word followed by a colon
static FORMATTED_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]+:.*$").expect("Invalid formatted line regex")
});

/// Pattern for page numbers such as "12."
static PAGE_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.$").expect("Invalid page number regex")
});

/// Pattern for parenthetical directions inside a cue, e.g. "TOM (V.O.)"
static PARENTHETICAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]*\)").expect("Invalid parenthetical regex")
});

/// How the raw text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain text that may already be in `CHARACTER: line` form
    PlainAlreadyFormatted,
    /// Text scraped from a paginated or rich document
    Unstructured,
}

/// Recovers structured dialogue from raw text
#[derive(Debug, Clone)]
pub struct DialogueSegmenter {
    config: SegmenterConfig,
    cleanup: CleanupPipeline,
}

impl Default for DialogueSegmenter {
    fn default() -> Self {
        Self::new(SegmenterConfig::default())
    }
}

impl DialogueSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            cleanup: CleanupPipeline::standard(),
        }
    }

    /// Replace the cleanup pipeline used for unstructured sources
    pub fn with_cleanup(mut self, cleanup: CleanupPipeline) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Segment raw text into a script
    ///
    /// Fails with `ParsingError::NoValidContent` when no line can be recovered.
    pub fn segment(&self, raw_text: &str, source: SourceKind) -> Result<Script, ParsingError> {
        let script = match source {
            SourceKind::PlainAlreadyFormatted if has_formatted_lines(raw_text) => {
                debug!("Input is already in CHARACTER: line form");
                self.segment_formatted(raw_text)
            }
            SourceKind::PlainAlreadyFormatted => self.segment_screenplay(raw_text),
            SourceKind::Unstructured => {
                let cleaned = self.cleanup.run(raw_text);
                self.segment_screenplay(&cleaned)
            }
        };

        if script.is_empty() {
            return Err(ParsingError::NoValidContent);
        }

        debug!("Segmented {} script lines", script.len());
        Ok(script)
    }

    fn segment_formatted(&self, text: &str) -> Script {
        Script::from_pairs(
            text.lines()
                .filter_map(|line| line.split_once(':')),
        )
    }

    fn segment_screenplay(&self, text: &str) -> Script {
        let lines: Vec<&str> = text.lines().collect();
        let mut script = Script::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i].trim();
            i += 1;

            if line.is_empty() || self.is_skippable(line) || !self.is_cue(line) {
                continue;
            }

            // Look ahead past blank lines for the dialogue candidate
            let Some(offset) = lines[i..].iter().position(|l| !l.trim().is_empty()) else {
                break;
            };
            let candidate = lines[i + offset].trim();
            if !self.is_dialogue(candidate) {
                continue;
            }

            let character = PARENTHETICAL_PATTERN.replace_all(line, "");
            if script.push_line(&character, candidate).is_ok() {
                i += offset + 1;
            }
        }

        script
    }

    fn is_skippable(&self, line: &str) -> bool {
        is_scene_heading(line)
            || line.starts_with('(')
            || PAGE_NUMBER_PATTERN.is_match(line)
            || self.is_boilerplate(line)
    }

    fn is_cue(&self, line: &str) -> bool {
        line == line.to_uppercase() && line.chars().count() < self.config.max_cue_length
    }

    fn is_dialogue(&self, line: &str) -> bool {
        !line.starts_with('(')
            && !is_scene_heading(line)
            && line != line.to_uppercase()
            && !self.is_boilerplate(line)
    }

    fn is_boilerplate(&self, line: &str) -> bool {
        self.config
            .boilerplate_markers
            .iter()
            .any(|marker| line.contains(marker.as_str()))
    }
}

fn has_formatted_lines(text: &str) -> bool {
    text.lines().any(|line| FORMATTED_LINE_PATTERN.is_match(line.trim()))
}

fn is_scene_heading(line: &str) -> bool {
    line.starts_with("INT.") || line.starts_with("EXT.")
}
