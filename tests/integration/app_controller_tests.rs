/*!
 * Tests for the application controller: loading scripts from disk and
 * running a rehearsal loop over mock ports.
 */

use anyhow::Result;
use std::sync::Arc;

use linerunner::app_config::Config;
use linerunner::app_controller::Controller;
use linerunner::errors::{ParsingError, RehearsalError};
use linerunner::ports::mock::{MockCapture, MockRecognizer, MockSceneAnalyzer, MockSynthesizer};

use crate::common;

/// Test loading a formatted text file
#[tokio::test]
async fn test_loadScript_formattedFile_shouldSegment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_formatted_script(temp_dir.path())?;
    let controller = Controller::new_for_test()?;

    let script = controller.load_script(&path, false).await?;

    assert_eq!(script.len(), 4);
    assert_eq!(controller.role_catalog(&script).line_count("JANE"), 2);
    Ok(())
}

/// Test loading extracted sides saved as text
#[tokio::test]
async fn test_loadScript_unstructuredText_shouldCleanAndSegment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "sides.txt", common::EXTRACTED_SIDES)?;
    let controller = Controller::new_for_test()?;

    let script = controller.load_script(&path, true).await?;

    assert_eq!(
        script.to_formatted(),
        "TOM: Did you see her?\nJANE: I saw someone.\nTOM: You always say that."
    );
    Ok(())
}

/// Test that a file without dialogue reports no valid content
#[tokio::test]
async fn test_loadScript_noDialogue_shouldFailWithParsingError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "notes.txt", "remember to buy milk\n")?;
    let controller = Controller::new_for_test()?;

    let err = controller.load_script(&path, false).await.unwrap_err();

    assert_eq!(err.downcast_ref::<ParsingError>(), Some(&ParsingError::NoValidContent));
    Ok(())
}

/// Test that PDF files need an external extractor
#[tokio::test]
async fn test_loadScript_pdfWithPlainExtractor_shouldBeUnsupported() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "sides.pdf", "%PDF-1.7")?;
    let controller = Controller::new_for_test()?;

    let err = controller.load_script(&path, false).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ParsingError>(),
        Some(ParsingError::UnsupportedFormat(_))
    ));
    Ok(())
}

/// Test that an invalid config is refused
#[test]
fn test_withConfig_invalidThreshold_shouldFail() {
    let mut config = Config::default();
    config.rehearsal.similarity_threshold = 2.0;

    assert!(Controller::with_config(config).is_err());
}

/// Test the rehearsal loop through to the end of the scene
#[tokio::test]
async fn test_rehearse_allLinesDelivered_shouldComplete() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_formatted_script(temp_dir.path())?;
    let controller = Controller::new_for_test()?;
    let script = controller.load_script(&path, false).await?;

    let synth = Arc::new(MockSynthesizer::working());
    let recognizer = Arc::new(MockRecognizer::with_transcripts(&[
        "did you see her",
        "nope",
        "you always say that",
    ]));

    let summary = controller.rehearse(script, "TOM", synth.clone(), recognizer).await?;

    assert!(summary.completed);
    assert_eq!(summary.total_lines, 4);
    assert_eq!(summary.lines_reached, 4);
    assert_eq!(summary.attempts, 3);
    assert_eq!(summary.delivered(), 2);
    assert!(summary.mean_score().unwrap() > 0.9);
    assert_eq!(synth.call_count(), 2);
    Ok(())
}

/// Test that a recognition error ends the loop early
#[tokio::test]
async fn test_rehearse_recognitionError_shouldStopEarly() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = controller.parse_text(common::FORMATTED_SCENE, linerunner::SourceKind::PlainAlreadyFormatted)?;
    let recognizer = Arc::new(MockRecognizer::with_captures(vec![
        MockCapture::transcript("did you see her"),
        MockCapture::Error("no speech detected".to_string()),
    ]));

    let summary = controller
        .rehearse(script, "TOM", Arc::new(MockSynthesizer::working()), recognizer)
        .await?;

    assert!(!summary.completed);
    assert_eq!(summary.lines_reached, 2);
    assert_eq!(summary.delivered(), 1);
    assert_eq!(summary.attempts, 2);
    Ok(())
}

/// Test that a failed reply is replayed once by the loop
#[tokio::test]
async fn test_rehearse_playbackFailure_shouldReplayLine() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = controller.parse_text(common::FORMATTED_SCENE, linerunner::SourceKind::PlainAlreadyFormatted)?;
    let synth = Arc::new(MockSynthesizer::fail_on_call(0));
    let recognizer = Arc::new(MockRecognizer::with_transcripts(&["did you see her", "you always say that"]));

    let summary = controller.rehearse(script, "TOM", synth.clone(), recognizer).await?;

    assert!(summary.completed);
    assert_eq!(summary.attempts, 2);
    assert_eq!(summary.delivered(), 2);
    assert_eq!(synth.call_count(), 3);
    assert_eq!(
        synth.spoken(),
        vec!["I saw someone.".to_string(), "Because it's always true.".to_string()]
    );
    Ok(())
}

/// Test that a failure on the opening line is replayed like any other
#[tokio::test]
async fn test_rehearse_openingPlaybackFailure_shouldReplayLine() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = controller.parse_text(common::FORMATTED_SCENE, linerunner::SourceKind::PlainAlreadyFormatted)?;
    let synth = Arc::new(MockSynthesizer::fail_on_call(0));
    let recognizer = Arc::new(MockRecognizer::with_transcripts(&["i saw someone", "because it's always true"]));

    let summary = controller.rehearse(script, "JANE", synth.clone(), recognizer).await?;

    assert!(summary.completed);
    assert_eq!(summary.delivered(), 2);
    assert_eq!(synth.call_count(), 3);
    assert_eq!(
        synth.spoken(),
        vec!["Did you see her?".to_string(), "You always say that.".to_string()]
    );
    Ok(())
}

/// Test that a line failing twice in a row ends the rehearsal with the error
#[tokio::test]
async fn test_rehearse_repeatedPlaybackFailure_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = controller.parse_text(common::FORMATTED_SCENE, linerunner::SourceKind::PlainAlreadyFormatted)?;
    let synth = Arc::new(MockSynthesizer::failing());

    let err = controller
        .rehearse(script, "JANE", synth.clone(), Arc::new(MockRecognizer::default()))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RehearsalError>(),
        Some(RehearsalError::PlaybackFailed(_))
    ));
    assert_eq!(synth.call_count(), 2);
    Ok(())
}

/// Test that an unknown role is rejected before anything is spoken
#[tokio::test]
async fn test_rehearse_unknownRole_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = controller.parse_text(common::FORMATTED_SCENE, linerunner::SourceKind::PlainAlreadyFormatted)?;
    let synth = Arc::new(MockSynthesizer::working());

    let err = controller
        .rehearse(script, "MAX", synth.clone(), Arc::new(MockRecognizer::default()))
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<RehearsalError>(),
        Some(&RehearsalError::UnknownRole("MAX".to_string()))
    );
    assert_eq!(synth.call_count(), 0);
    Ok(())
}

/// Test scene analysis through the mock analyzer
#[tokio::test]
async fn test_analyzeScene_shouldSendFormattedScript() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = controller.parse_text(common::FORMATTED_SCENE, linerunner::SourceKind::PlainAlreadyFormatted)?;
    let analyzer = MockSceneAnalyzer::working();

    let analysis = controller.analyze_scene(&script, &analyzer).await?;

    assert!(analysis.contains("Objective"));
    let prompt = analyzer.last_prompt().unwrap();
    assert!(prompt.contains("TOM: Did you see her?"));
    assert_eq!(prompt, controller.analysis_prompt(&script)?);
    Ok(())
}

/// Test that analyzer failures surface as errors
#[tokio::test]
async fn test_analyzeScene_failingAnalyzer_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let script = controller.parse_text(common::FORMATTED_SCENE, linerunner::SourceKind::PlainAlreadyFormatted)?;

    let result = controller.analyze_scene(&script, &MockSceneAnalyzer::failing()).await;

    assert!(result.is_err());
    Ok(())
}
