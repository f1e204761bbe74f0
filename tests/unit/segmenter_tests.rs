/*!
 * Tests for dialogue segmentation and text cleanup
 */

use linerunner::app_config::SegmenterConfig;
use linerunner::errors::ParsingError;
use linerunner::script::{CleanupPipeline, CleanupRule, DialogueSegmenter, Script, SourceKind};

use crate::common;

fn pairs(script: &Script) -> Vec<(String, String)> {
    script
        .iter()
        .map(|line| (line.character.clone(), line.text.clone()))
        .collect()
}

/// Test that formatted plain text is taken line by line
#[test]
fn test_segment_formattedScene_shouldKeepEveryLineInOrder() {
    let segmenter = DialogueSegmenter::default();
    let script = segmenter
        .segment(common::FORMATTED_SCENE, SourceKind::PlainAlreadyFormatted)
        .unwrap();

    assert_eq!(script.len(), 4);
    assert_eq!(script.get(0).unwrap().to_string(), "TOM: Did you see her?");
    assert_eq!(script.get(3).unwrap().to_string(), "JANE: Because it's always true.");
    let indices: Vec<usize> = script.iter().map(|line| line.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

/// Test that extracted sides lose their page furniture
#[test]
fn test_segment_extractedSides_shouldRecoverDialogue() {
    let segmenter = DialogueSegmenter::default();
    let script = segmenter
        .segment(common::EXTRACTED_SIDES, SourceKind::Unstructured)
        .unwrap();

    assert_eq!(
        pairs(&script),
        vec![
            ("TOM".to_string(), "Did you see her?".to_string()),
            ("JANE".to_string(), "I saw someone.".to_string()),
            ("TOM".to_string(), "You always say that.".to_string()),
        ]
    );
}

/// Test that a single formatted line switches the whole text to the fast path
#[test]
fn test_segment_mixedPlainText_shouldUseFastPathOnly() {
    let segmenter = DialogueSegmenter::default();
    let raw = "TOM\nHello there.\nJANE: Hi.";
    let script = segmenter.segment(raw, SourceKind::PlainAlreadyFormatted).unwrap();

    assert_eq!(pairs(&script), vec![("JANE".to_string(), "Hi.".to_string())]);
}

/// Test that a lowercase speaker label is not recognized as formatted
#[test]
fn test_segment_lowercaseLabels_shouldFallBackToScreenplay() {
    let segmenter = DialogueSegmenter::default();
    let result = segmenter.segment("Tom: hi\nJane: hello", SourceKind::PlainAlreadyFormatted);

    assert_eq!(result, Err(ParsingError::NoValidContent));
}

/// Test that custom boilerplate markers are skipped
#[test]
fn test_segment_customBoilerplate_shouldSkipMarkedLines() {
    let config = SegmenterConfig {
        boilerplate_markers: vec!["CONFIDENTIAL".to_string()],
        ..SegmenterConfig::default()
    };
    let segmenter = DialogueSegmenter::new(config);
    let script = segmenter
        .segment("CONFIDENTIAL\nDo not share.\nTOM\nHello.", SourceKind::Unstructured)
        .unwrap();

    assert_eq!(pairs(&script), vec![("TOM".to_string(), "Hello.".to_string())]);
}

/// Test that the cleanup pipeline can be replaced
#[test]
fn test_segment_withoutCleanup_shouldKeepFooterLines() {
    let segmenter = DialogueSegmenter::default().with_cleanup(CleanupPipeline::new(Vec::new()));
    // Without the whitespace rule the cue and line stay on one line
    let script = segmenter.segment("TOM    Are you coming?", SourceKind::Unstructured);

    assert_eq!(script, Err(ParsingError::NoValidContent));
}

/// Test the order of the standard cleanup rules
#[test]
fn test_cleanupPipeline_standard_shouldEndWithWhitespaceRules() {
    let pipeline = CleanupPipeline::standard();
    let rules = pipeline.rules();

    assert_eq!(rules.first(), Some(&CleanupRule::StripFooter));
    assert_eq!(
        &rules[rules.len() - 2..],
        &[CleanupRule::CollapseWhitespace, CleanupRule::DropEmptyLines]
    );
}

/// Test that cleanup strips dates and labels from scraped text
#[test]
fn test_cleanupPipeline_run_shouldStripPageFurniture() {
    let cleaned = CleanupPipeline::standard().run("Table Draft 3/14/2024\nSCENE B\nTOM\nHello.\n← END");

    assert_eq!(cleaned, "TOM\nHello.");
}
