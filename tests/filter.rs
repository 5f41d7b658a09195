//! S3 (filter + depth balance) and testable property 3 (filter exclusion).

mod common;

use common::{stderr_lines, Harness};

#[test]
fn s3_filtered_name_produces_no_echo_and_does_not_unbalance_depth() {
    let dir = tempfile::tempdir().unwrap();
    let output = Harness::new("s3_filter", dir.path())
        .trace("echo")
        .filter("wanted")
        .run();

    assert!(output.status.success(), "harness exited with {:?}: {}", output.status, String::from_utf8_lossy(&output.stderr));

    let lines = stderr_lines(&output);
    assert!(lines.iter().any(|l| l.contains("ENTER wanted")));
    assert!(lines.iter().any(|l| l.contains("LEAVE wanted")));
    assert!(!lines.iter().any(|l| l.contains("unwanted")));
}
