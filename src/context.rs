//! Per-thread tracing state: display name, call depth, and (when Summary
//! is enabled) the stack of composite span names.
//!
//! Bound to the thread via `thread_local!` rather than a process-wide
//! singleton, so the hot path never takes a lock to read or mutate it.

use std::cell::RefCell;

use crate::domain::{ProcessId, Timestamp};
use crate::lifecycle::{self, TraceFlags};

pub(crate) struct StackFrame {
    pub(crate) name: String,
    pub(crate) enter: Timestamp,
}

pub(crate) struct ThreadContext {
    pub(crate) display_name: String,
    pub(crate) depth: u32,
    pub(crate) stack: Vec<StackFrame>,
    process_id: Option<ProcessId>,
}

impl ThreadContext {
    fn new() -> Self {
        let display_name = if lifecycle::is_main_thread() {
            "Main process".to_string()
        } else {
            format!("Thread {}", lifecycle::next_thread_seq())
        };

        let flags = lifecycle::flags();
        let process_id = if flags.contains(TraceFlags::BINARY) {
            lifecycle::state().and_then(|state| state.binary()).map(|binary| {
                let id = binary.next_process_id();
                binary.begin_process(id, &display_name, Timestamp::now());
                id
            })
        } else {
            None
        };

        ThreadContext {
            display_name,
            depth: 0,
            stack: Vec::new(),
            process_id,
        }
    }

    pub(crate) fn process_id(&self) -> Option<ProcessId> {
        self.process_id
    }
}

impl Drop for ThreadContext {
    fn drop(&mut self) {
        let Some(pid) = self.process_id else {
            return;
        };
        if !lifecycle::flags().contains(TraceFlags::BINARY) {
            return;
        }
        if let Some(binary) = lifecycle::state().and_then(|state| state.binary()) {
            binary.end_process(pid, Timestamp::now());
        }
    }
}

thread_local! {
    static CONTEXT: RefCell<Option<ThreadContext>> = const { RefCell::new(None) };
}

/// Run `f` with exclusive access to the calling thread's context, creating
/// it lazily on first use. Never called on the inert (flags = Off) path.
pub(crate) fn with_context<R>(f: impl FnOnce(&mut ThreadContext) -> R) -> R {
    CONTEXT.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(ThreadContext::new());
        }
        f(slot.as_mut().expect("just initialized above"))
    })
}
