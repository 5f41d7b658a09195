//! S1 (echo ordering/indentation), S2 (summary counts), and testable
//! property 2 (balance).

mod common;

use common::{stderr_lines, Harness};

#[test]
fn s1_echo_nests_with_two_space_indent_and_formatted_args() {
    let dir = tempfile::tempdir().unwrap();
    let output = Harness::new("s1_echo", dir.path()).trace("echo").run();

    assert!(output.status.success());
    let lines = stderr_lines(&output);
    assert_eq!(lines.len(), 4, "lines: {lines:?}");

    assert!(lines[0].contains("ENTER outer"));
    assert!(!lines[0].contains("  ENTER"), "outer enter must be at depth 0");

    assert!(lines[1].contains("  ENTER inner (x=1)"));

    assert!(lines[2].contains("  LEAVE inner"));
    assert!(lines[2].contains('s'), "leave line should report a duration");

    assert!(lines[3].contains("LEAVE outer"));
    assert!(!lines[3].starts_with("  "), "outer leave must be back at depth 0");
}

#[test]
fn property2_enter_leave_lines_balance() {
    let dir = tempfile::tempdir().unwrap();
    let output = Harness::new("s1_echo", dir.path()).trace("echo").run();

    let lines = stderr_lines(&output);
    let enters = lines.iter().filter(|l| l.contains("ENTER")).count();
    let leaves = lines.iter().filter(|l| l.contains("LEAVE")).count();
    assert_eq!(enters, leaves);
}

#[test]
fn s2_summary_accumulates_duration_and_count_per_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = Harness::new("s2_summary", dir.path()).trace("summary").run();

    assert!(output.status.success());
    let lines = stderr_lines(&output);

    assert_eq!(lines[0], "# stack duration[s] count");

    let a_line = lines.iter().find(|l| l.starts_with("a ")).expect("missing path 'a'");
    let mut parts = a_line.split_whitespace();
    parts.next();
    let _seconds: f64 = parts.next().unwrap().parse().unwrap();
    let count: u64 = parts.next().unwrap().parse().unwrap();
    assert_eq!(count, 3);

    let ab_line = lines.iter().find(|l| l.starts_with("a/b ")).expect("missing path 'a/b'");
    let mut parts = ab_line.split_whitespace();
    parts.next();
    let _seconds: f64 = parts.next().unwrap().parse().unwrap();
    let count: u64 = parts.next().unwrap().parse().unwrap();
    assert_eq!(count, 3);
}
