/*!
 * Cleanup rules for text scraped from paginated documents.
 *
 * Page-scraped screenplay sides carry footers, dates, draft labels and
 * start/end markers. Each of these is removed by one named rule; the rules
 * run in a fixed order as a pipeline.
 */

use std::sync::LazyLock;

use regex::Regex;

static FOOTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)Sides by Breakdown Services.*$").expect("Invalid footer regex")
});

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}").expect("Invalid date regex")
});

static DRAFT_LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)Table Draft.*$").expect("Invalid draft label regex")
});

static SCENE_LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SCENE [A-Z]").expect("Invalid scene label regex")
});

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"START →|← END").expect("Invalid marker regex")
});

static WHITESPACE_RUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s{2,}").expect("Invalid whitespace regex")
});

/// A single cleanup step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupRule {
    /// Remove "Sides by Breakdown Services" footers to the end of the line
    StripFooter,
    /// Remove dates such as `3/14/2024`
    StripDates,
    /// Remove "Table Draft" labels to the end of the line
    StripDraftLabels,
    /// Remove "SCENE A"-style labels
    StripSceneLabels,
    /// Remove `START →` and `← END` markers
    StripDirectionalMarkers,
    /// Turn runs of two or more whitespace characters into a line break
    CollapseWhitespace,
    /// Drop lines that are empty or whitespace-only
    DropEmptyLines,
}

impl CleanupRule {
    /// Apply this rule to the text
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::StripFooter => FOOTER_PATTERN.replace_all(text, "").into_owned(),
            Self::StripDates => DATE_PATTERN.replace_all(text, "").into_owned(),
            Self::StripDraftLabels => DRAFT_LABEL_PATTERN.replace_all(text, "").into_owned(),
            Self::StripSceneLabels => SCENE_LABEL_PATTERN.replace_all(text, "").into_owned(),
            Self::StripDirectionalMarkers => MARKER_PATTERN.replace_all(text, "").into_owned(),
            Self::CollapseWhitespace => WHITESPACE_RUN_PATTERN.replace_all(text, "\n").into_owned(),
            Self::DropEmptyLines => text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StripFooter => "strip-footer",
            Self::StripDates => "strip-dates",
            Self::StripDraftLabels => "strip-draft-labels",
            Self::StripSceneLabels => "strip-scene-labels",
            Self::StripDirectionalMarkers => "strip-directional-markers",
            Self::CollapseWhitespace => "collapse-whitespace",
            Self::DropEmptyLines => "drop-empty-lines",
        }
    }
}

/// Ordered list of cleanup rules
#[derive(Debug, Clone)]
pub struct CleanupPipeline {
    rules: Vec<CleanupRule>,
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl CleanupPipeline {
    /// Create a pipeline with the given rules, applied in order
    pub fn new(rules: Vec<CleanupRule>) -> Self {
        Self { rules }
    }

    /// The rules used for page-scraped sources
    pub fn standard() -> Self {
        Self::new(vec![
            CleanupRule::StripFooter,
            CleanupRule::StripDates,
            CleanupRule::StripDraftLabels,
            CleanupRule::StripSceneLabels,
            CleanupRule::StripDirectionalMarkers,
            CleanupRule::CollapseWhitespace,
            CleanupRule::DropEmptyLines,
        ])
    }

    pub fn rules(&self) -> &[CleanupRule] {
        &self.rules
    }

    /// Run every rule over the text in order
    pub fn run(&self, text: &str) -> String {
        self.rules.iter().fold(text.to_string(), |acc, rule| {
            let cleaned = rule.apply(&acc);
            log::trace!("cleanup rule {} applied ({} -> {} bytes)", rule.name(), acc.len(), cleaned.len());
            cleaned
        })
    }
}
