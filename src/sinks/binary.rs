//! Binary trace sink.
//!
//! The original specifies an externally-defined OTF (Open Trace Format)
//! writer; no maintained Rust binding for that format exists in this
//! ecosystem, so this sink defines its own compact record stream instead
//! (see DESIGN.md). It is written as a flat sequence of `bincode`-encoded
//! [`BinaryRecord`] frames with no extra length prefix — each record's
//! own encoding is self-delimiting, so a reader repeatedly calls
//! `bincode::deserialize_from` until EOF.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::domain::{BinaryFileOp, CounterId, FileId, FunctionId, ProcessId, Timestamp, TraceError};

const TICKS_PER_SECOND: u64 = 1_000_000;

#[derive(Debug, Serialize, Deserialize)]
pub enum BinaryRecord {
    CreatorDef { name: String },
    TimerResolutionDef { ticks_per_second: u64 },
    ProcessDef { id: ProcessId, name: String },
    ProcessBegin { id: ProcessId, ts: Timestamp },
    ProcessEnd { id: ProcessId, ts: Timestamp },
    FunctionDef { id: FunctionId, name: String },
    FileDef { id: FileId, path: String },
    CounterDef { id: CounterId, name: String },
    Enter { ts: Timestamp, function: FunctionId, process: ProcessId },
    Leave { ts: Timestamp, function: FunctionId, process: ProcessId },
    BeginFileOp { ts: Timestamp, process: ProcessId, file: FileId },
    EndFileOp { ts: Timestamp, process: ProcessId, file: FileId, op: BinaryFileOp, length: u64 },
    Counter { ts: Timestamp, process: ProcessId, counter: CounterId, value: u64 },
}

#[derive(Default)]
struct InternTables {
    functions: HashMap<String, FunctionId>,
    files: HashMap<String, FileId>,
    counters: HashMap<String, CounterId>,
    next_function: u32,
    next_file: u32,
    next_counter: u32,
}

impl InternTables {
    fn new() -> Self {
        InternTables {
            next_function: 1,
            next_file: 1,
            next_counter: 1,
            ..Default::default()
        }
    }
}

/// Binary sink: a writer mutex (serializes the actual I/O) plus a
/// separate intern-table mutex (serializes only the lookup-or-insert),
/// per the original's lock-scope design note.
pub struct BinarySink {
    intern: Mutex<InternTables>,
    writer: Mutex<Option<BufWriter<File>>>,
    next_process: AtomicU32,
}

impl BinarySink {
    pub fn new(process_name: &str) -> Result<Self, TraceError> {
        let file = File::create(format!("{process_name}.jtrace"))?;
        let sink = BinarySink {
            intern: Mutex::new(InternTables::new()),
            writer: Mutex::new(Some(BufWriter::new(file))),
            next_process: AtomicU32::new(1),
        };
        sink.write(&BinaryRecord::CreatorDef { name: "JTrace".to_string() });
        sink.write(&BinaryRecord::TimerResolutionDef { ticks_per_second: TICKS_PER_SECOND });
        Ok(sink)
    }

    /// Build a sink over an already-open file, for tests that want to
    /// control the file's location without depending on the process
    /// working directory.
    #[cfg(test)]
    pub(crate) fn with_file(file: File) -> Self {
        let sink = BinarySink {
            intern: Mutex::new(InternTables::new()),
            writer: Mutex::new(Some(BufWriter::new(file))),
            next_process: AtomicU32::new(1),
        };
        sink.write(&BinaryRecord::CreatorDef { name: "JTrace".to_string() });
        sink.write(&BinaryRecord::TimerResolutionDef { ticks_per_second: TICKS_PER_SECOND });
        sink
    }

    pub fn next_process_id(&self) -> ProcessId {
        ProcessId(self.next_process.fetch_add(1, Ordering::Relaxed))
    }

    pub fn begin_process(&self, id: ProcessId, name: &str, ts: Timestamp) {
        self.write(&BinaryRecord::ProcessDef { id, name: name.to_string() });
        self.write(&BinaryRecord::ProcessBegin { id, ts });
    }

    pub fn end_process(&self, id: ProcessId, ts: Timestamp) {
        self.write(&BinaryRecord::ProcessEnd { id, ts });
    }

    pub fn intern_function(&self, name: &str) -> FunctionId {
        self.intern_named(name, |t| &mut t.functions, |t| &mut t.next_function, FunctionId, |id, name| {
            BinaryRecord::FunctionDef { id, name }
        })
    }

    pub fn intern_file(&self, path: &str) -> FileId {
        self.intern_named(path, |t| &mut t.files, |t| &mut t.next_file, FileId, |id, path| {
            BinaryRecord::FileDef { id, path }
        })
    }

    pub fn intern_counter(&self, name: &str) -> CounterId {
        self.intern_named(name, |t| &mut t.counters, |t| &mut t.next_counter, CounterId, |id, name| {
            BinaryRecord::CounterDef { id, name }
        })
    }

    /// Shared lookup-or-insert shape for the three intern tables: hold the
    /// intern lock only long enough to assign an id, then write the
    /// definition record (if this name is new) outside that lock.
    fn intern_named<Id, MapFn, NextFn, MakeId, MakeDef>(
        &self,
        name: &str,
        map: MapFn,
        next: NextFn,
        make_id: MakeId,
        make_def: MakeDef,
    ) -> Id
    where
        Id: Copy,
        MapFn: Fn(&mut InternTables) -> &mut HashMap<String, Id>,
        NextFn: Fn(&mut InternTables) -> &mut u32,
        MakeId: Fn(u32) -> Id,
        MakeDef: Fn(Id, String) -> BinaryRecord,
    {
        let mut new_id = None;
        let id = {
            let mut tables = self.intern.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(id) = map(&mut tables).get(name) {
                *id
            } else {
                let counter = next(&mut tables);
                let id = make_id(*counter);
                *counter += 1;
                map(&mut tables).insert(name.to_string(), id);
                new_id = Some(id);
                id
            }
        };
        if let Some(id) = new_id {
            self.write(&make_def(id, name.to_string()));
        }
        id
    }

    pub fn enter(&self, ts: Timestamp, function: FunctionId, process: ProcessId) {
        self.write(&BinaryRecord::Enter { ts, function, process });
    }

    pub fn leave(&self, ts: Timestamp, function: FunctionId, process: ProcessId) {
        self.write(&BinaryRecord::Leave { ts, function, process });
    }

    pub fn file_begin(&self, ts: Timestamp, process: ProcessId, file: FileId) {
        self.write(&BinaryRecord::BeginFileOp { ts, process, file });
    }

    pub fn file_end(&self, ts: Timestamp, process: ProcessId, file: FileId, op: BinaryFileOp, length: u64) {
        self.write(&BinaryRecord::EndFileOp { ts, process, file, op, length });
    }

    pub fn counter(&self, ts: Timestamp, process: ProcessId, counter: CounterId, value: u64) {
        self.write(&BinaryRecord::Counter { ts, process, counter, value });
    }

    fn write(&self, record: &BinaryRecord) {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let Some(writer) = guard.as_mut() else {
            return;
        };
        if let Err(e) = bincode::serialize_into(writer, record) {
            log::warn!("jtrace binary sink: failed to write record: {}", TraceError::Encode(e));
        }
    }

    /// Flush and drop the backing writer. Idempotent: a second call is a
    /// no-op because the writer was already taken.
    pub fn close(&self) {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(mut writer) = guard.take() {
            if let Err(e) = writer.flush() {
                log::warn!("jtrace binary sink: failed to flush trace file: {e}");
            }
        }
    }
}
