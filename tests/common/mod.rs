use std::path::PathBuf;

use tempfile::TempDir;

/// Copy the sample report into a fresh temporary directory, returning the
/// dir handle and report path. The caller must hold onto `TempDir` to keep
/// the temp directory alive.
pub fn setup_report() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let xml_path = dir.path().join("coverage.xml");
    std::fs::write(&xml_path, include_bytes!("../fixtures/coverage.xml")).unwrap();
    (dir, xml_path)
}
