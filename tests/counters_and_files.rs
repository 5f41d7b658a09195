//! S4 (counter line) and S5 (file begin/end lines).

mod common;

use common::{stderr_lines, Harness};

#[test]
fn s4_counter_line_format() {
    let dir = tempfile::tempdir().unwrap();
    let output = Harness::new("s4_counter", dir.path()).trace("echo").run();

    assert!(output.status.success());
    let lines = stderr_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("COUNTER cache_hits 42"));
}

#[test]
fn s5_file_ops_report_length_offset_only_for_read_write() {
    let dir = tempfile::tempdir().unwrap();
    let output = Harness::new("s5_file_ops", dir.path()).trace("echo").run();

    assert!(output.status.success());
    let lines = stderr_lines(&output);
    assert_eq!(lines.len(), 4, "lines: {lines:?}");

    assert!(lines[0].contains("BEGIN read /tmp/data"));
    assert!(lines[1].contains("END read /tmp/data (length=128, offset=1024)"));
    assert!(lines[2].contains("BEGIN close /tmp/data"));
    assert!(lines[3].contains("END close /tmp/data"));
    assert!(!lines[3].contains("length="));
}
