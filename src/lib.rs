/*!
 * # linerunner - Rehearse your lines with a synthetic scene partner
 *
 * A Rust library that turns a script into ordered dialogue lines and runs a
 * turn-taking rehearsal: other characters' lines are spoken aloud, the
 * user's lines are captured and scored against the script.
 *
 * ## Features
 *
 * - Segment raw script text into `CHARACTER: text` lines:
 *   - Fast path for already formatted plain text
 *   - Screenplay heuristic for text extracted from PDF/DOCX sides
 *   - Cleanup of page footers, dates and scene labels
 * - Role catalog with per-role line counts
 * - Levenshtein-based similarity scoring with a configurable threshold
 * - Turn-taking rehearsal controller over pluggable speech ports
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `script`: Script model and dialogue segmentation:
 *   - `script::cleanup`: Regex cleanup of extracted text
 *   - `script::segmenter`: Dialogue segmentation
 *   - `script::roles`: Role catalog
 * - `similarity`: Transcript scoring
 * - `rehearsal`: Session state machine and controller
 * - `ports`: Speech, extraction and analysis boundaries with console and mock implementations
 * - `file_utils`: File system operations and document kinds
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod ports;
pub mod rehearsal;
pub mod script;
pub mod similarity;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ParsingError, PortError, RehearsalError, ScriptError};
pub use rehearsal::{RehearsalController, RehearsalSession, SessionState, TurnOutcome};
pub use script::{DialogueSegmenter, RoleCatalog, Script, ScriptLine, SourceKind};
pub use similarity::{similarity, SimilarityScorer};
