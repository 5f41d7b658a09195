//! Line-oriented textual echo sink.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::{FileOp, Timestamp};

/// Formats and writes one line per event to the process's standard
/// diagnostic stream. A single mutex guards the whole formatted line so
/// concurrent threads never interleave partial lines.
pub struct EchoSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

fn header(ts: Timestamp, process_name: &str, thread_name: &str, depth: u32) -> String {
    let mut line = format!("[{ts}] {process_name} {thread_name}: ");
    for _ in 0..depth {
        line.push_str("  ");
    }
    line
}

impl EchoSink {
    pub fn new() -> Self {
        EchoSink {
            writer: Mutex::new(Box::new(io::stderr())),
        }
    }

    /// Build a sink over an arbitrary writer, for testing the line format
    /// without touching the real process stderr.
    #[cfg(test)]
    pub(crate) fn with_writer(writer: impl Write + Send + 'static) -> Self {
        EchoSink {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn enter(
        &self,
        ts: Timestamp,
        process_name: &str,
        thread_name: &str,
        depth: u32,
        name: &str,
        args: Option<fmt::Arguments<'_>>,
    ) {
        let mut line = header(ts, process_name, thread_name, depth);
        match args {
            Some(args) => line.push_str(&format!("ENTER {name} ({args})\n")),
            None => line.push_str(&format!("ENTER {name}\n")),
        }
        self.write_line(&line);
    }

    pub fn leave(
        &self,
        ts: Timestamp,
        process_name: &str,
        thread_name: &str,
        depth: u32,
        name: &str,
        duration_secs: f64,
    ) {
        let mut line = header(ts, process_name, thread_name, depth);
        line.push_str(&format!("LEAVE {name} [{duration_secs:.6}s]\n"));
        self.write_line(&line);
    }

    pub fn file_begin(
        &self,
        ts: Timestamp,
        process_name: &str,
        thread_name: &str,
        depth: u32,
        path: &str,
        op: FileOp,
    ) {
        let mut line = header(ts, process_name, thread_name, depth);
        line.push_str(&format!("BEGIN {} {path}\n", op.name()));
        self.write_line(&line);
    }

    pub fn file_end(
        &self,
        ts: Timestamp,
        process_name: &str,
        thread_name: &str,
        depth: u32,
        path: &str,
        op: FileOp,
        length: u64,
        offset: u64,
    ) {
        let mut line = header(ts, process_name, thread_name, depth);
        line.push_str(&format!("END {} {path}", op.name()));
        if matches!(op, FileOp::Read | FileOp::Write) {
            line.push_str(&format!(" (length={length}, offset={offset})"));
        }
        line.push('\n');
        self.write_line(&line);
    }

    pub fn counter(
        &self,
        ts: Timestamp,
        process_name: &str,
        thread_name: &str,
        depth: u32,
        name: &str,
        value: u64,
    ) {
        let mut line = header(ts, process_name, thread_name, depth);
        line.push_str(&format!("COUNTER {name} {value}\n"));
        self.write_line(&line);
    }

    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let _ = writer.write_all(line.as_bytes());
    }
}

impl Default for EchoSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<StdMutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn as_string(buf: &SharedBuf) -> String {
        String::from_utf8(buf.0.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn enter_without_args_has_no_parens() {
        let buf = SharedBuf::default();
        let sink = EchoSink::with_writer(buf.clone());
        sink.enter(Timestamp(0), "proc", "Main process", 0, "a", None);
        assert_eq!(as_string(&buf), "[0.000000] proc Main process: ENTER a\n");
    }

    #[test]
    fn enter_with_args_appends_parens() {
        let buf = SharedBuf::default();
        let sink = EchoSink::with_writer(buf.clone());
        sink.enter(
            Timestamp(0),
            "proc",
            "Main process",
            1,
            "a",
            Some(format_args!("x=1")),
        );
        assert_eq!(
            as_string(&buf),
            "[0.000000] proc Main process:   ENTER a (x=1)\n"
        );
    }

    #[test]
    fn leave_reports_duration() {
        let buf = SharedBuf::default();
        let sink = EchoSink::with_writer(buf.clone());
        sink.leave(Timestamp(500_000), "proc", "Main process", 0, "a", 0.5);
        assert_eq!(
            as_string(&buf),
            "[0.500000] proc Main process: LEAVE a [0.500000s]\n"
        );
    }

    #[test]
    fn file_end_appends_length_offset_for_read_write() {
        let buf = SharedBuf::default();
        let sink = EchoSink::with_writer(buf.clone());
        sink.file_end(Timestamp(0), "proc", "Main process", 0, "/p", FileOp::Read, 128, 1024);
        assert_eq!(
            as_string(&buf),
            "[0.000000] proc Main process: END read /p (length=128, offset=1024)\n"
        );
    }

    #[test]
    fn file_end_omits_length_offset_for_other_ops() {
        let buf = SharedBuf::default();
        let sink = EchoSink::with_writer(buf.clone());
        sink.file_end(Timestamp(0), "proc", "Main process", 0, "/p", FileOp::Close, 0, 0);
        assert_eq!(as_string(&buf), "[0.000000] proc Main process: END close /p\n");
    }

    #[test]
    fn counter_line_format() {
        let buf = SharedBuf::default();
        let sink = EchoSink::with_writer(buf.clone());
        sink.counter(Timestamp(0), "proc", "Main process", 0, "cache_hits", 42);
        assert_eq!(
            as_string(&buf),
            "[0.000000] proc Main process: COUNTER cache_hits 42\n"
        );
    }
}
