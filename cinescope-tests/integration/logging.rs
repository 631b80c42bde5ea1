//! Per-run log file setup.

use cinescope_core::tracing_setup::{LOG_FILE_NAME, init_tracing};
use tempfile::TempDir;
use tracing::Level;

#[test]
fn test_init_tracing_creates_log_file() {
    let temp_dir = TempDir::new().expect("temp dir");
    let logs_dir = temp_dir.path().join("logs");

    let path = init_tracing(Level::WARN, Some(&logs_dir)).expect("install subscriber");
    tracing::warn!(target: "cinescope_tests", "written to the run log");

    assert_eq!(path, logs_dir.join(LOG_FILE_NAME));
    assert!(path.exists());

    // Only one global subscriber per process.
    assert!(init_tracing(Level::WARN, Some(&logs_dir)).is_err());
}
