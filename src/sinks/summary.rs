//! In-memory aggregated summary sink.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
struct SummaryEntry {
    seconds: f64,
    count: u64,
}

/// Accumulates total duration and hit count per composite stack path.
/// Dumped once, at `fini`.
pub struct SummarySink {
    table: Mutex<HashMap<String, SummaryEntry>>,
}

impl SummarySink {
    pub fn new() -> Self {
        SummarySink {
            table: Mutex::new(HashMap::new()),
        }
    }

    pub fn record(&self, path: &str, duration_secs: f64) {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        table
            .entry(path.to_string())
            .and_modify(|e| {
                e.seconds += duration_secs;
                e.count += 1;
            })
            .or_insert(SummaryEntry { seconds: duration_secs, count: 1 });
    }

    /// Emit the header and one line per entry, in unspecified order.
    pub fn dump(&self, out: &mut dyn Write) {
        let table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        let _ = writeln!(out, "# stack duration[s] count");
        for (path, entry) in table.iter() {
            let _ = writeln!(out, "{path} {:.6} {}", entry.seconds, entry.count);
        }
    }
}

impl Default for SummarySink {
    fn default() -> Self {
        Self::new()
    }
}
