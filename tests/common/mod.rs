/*!
 * Common test utilities for the linerunner test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Formatted two-hander used across the suite
pub const FORMATTED_SCENE: &str = "TOM: Did you see her?
JANE: I saw someone.
TOM: You always say that.
JANE: Because it's always true.
";

/// Sides as they come out of a PDF text layer
pub const EXTRACTED_SIDES: &str = "Table Draft 3/14/2024
SCENE A START →
INT. KITCHEN - NIGHT
1.
(whispering)
TOM
Did you see her?
JANE (O.S.)
I saw someone.
Sides by Breakdown Services - Actors Access Page 1 of 2
2.
TOM
You always say that.
← END
";

/// Route log output through the test harness
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates the formatted sample scene as a .txt file
pub fn create_formatted_script(dir: &Path) -> Result<PathBuf> {
    create_test_file(dir, "scene.txt", FORMATTED_SCENE)
}
