//! Public event API: `enter`/`leave`/`file_begin`/`file_end`/`counter`.
//!
//! Every entry point starts with the same fast-path check against
//! [`lifecycle::flags`]; when tracing is off this is a single relaxed
//! atomic load and an early return.

use std::fmt;

use crate::context::{self, StackFrame};
use crate::domain::{FileOp, Timestamp};
use crate::lifecycle::{self, TraceFlags};

/// A live span returned by [`enter`]/[`enter_fmt`]. Must be passed back to
/// [`leave`] exactly once; consuming it by value rules out calling `leave`
/// twice on the same span.
pub struct Span {
    name: String,
    entered_at: Timestamp,
}

/// Begin a named span. Returns `None` if tracing is off, uninitialized, or
/// `name` is excluded by the configured filter.
pub fn enter(name: &str) -> Option<Span> {
    enter_inner(name, None)
}

/// As [`enter`], but with deferred-formatted arguments echoed alongside the
/// `ENTER` line. Backs the `trace_enter!` macro.
pub fn enter_fmt(name: &str, args: fmt::Arguments<'_>) -> Option<Span> {
    enter_inner(name, Some(args))
}

fn enter_inner(name: &str, args: Option<fmt::Arguments<'_>>) -> Option<Span> {
    let flags = lifecycle::flags();
    if flags.is_empty() {
        return None;
    }
    let state = lifecycle::state()?;

    if let Some(filter) = state.filter() {
        if !filter.matches(name) {
            return None;
        }
    }

    let ts = Timestamp::now();

    context::with_context(|ctx| {
        if flags.contains(TraceFlags::ECHO) {
            if let Some(echo) = state.echo() {
                echo.enter(ts, state.process_name(), &ctx.display_name, ctx.depth, name, args);
            }
        }

        if flags.contains(TraceFlags::BINARY) {
            if let (Some(binary), Some(pid)) = (state.binary(), ctx.process_id()) {
                let function = binary.intern_function(name);
                binary.enter(ts, function, pid);
            }
        }

        if flags.contains(TraceFlags::SUMMARY) {
            let composite = match ctx.stack.last() {
                Some(top) => format!("{}/{name}", top.name),
                None => name.to_string(),
            };
            ctx.stack.push(StackFrame { name: composite, enter: ts });
        }

        ctx.depth += 1;
    });

    Some(Span { name: name.to_string(), entered_at: ts })
}

/// End a span previously returned by [`enter`]/[`enter_fmt`]. Passing
/// `None` (a filtered-out or off-time `enter`) is a harmless no-op.
pub fn leave(span: Option<Span>) {
    let Some(span) = span else {
        return;
    };

    let flags = lifecycle::flags();
    if flags.is_empty() {
        return;
    }
    let Some(state) = lifecycle::state() else {
        return;
    };

    if let Some(filter) = state.filter() {
        if !filter.matches(&span.name) {
            return;
        }
    }

    let ts = Timestamp::now();

    context::with_context(|ctx| {
        if ctx.depth == 0 {
            log::warn!("jtrace: leave({:?}) with no matching enter on this thread", span.name);
            return;
        }
        ctx.depth -= 1;

        let duration = ts.since_as_secs(span.entered_at);

        if flags.contains(TraceFlags::ECHO) {
            if let Some(echo) = state.echo() {
                echo.leave(ts, state.process_name(), &ctx.display_name, ctx.depth, &span.name, duration);
            }
        }

        if flags.contains(TraceFlags::BINARY) {
            if let (Some(binary), Some(pid)) = (state.binary(), ctx.process_id()) {
                let function = binary.intern_function(&span.name);
                binary.leave(ts, function, pid);
            }
        }

        if flags.contains(TraceFlags::SUMMARY) {
            if let Some(frame) = ctx.stack.pop() {
                if let Some(summary) = state.summary() {
                    summary.record(&frame.name, duration);
                }
            } else {
                log::warn!("jtrace: summary stack underflow leaving {:?}", span.name);
            }
        }
    });
}

/// Record the start of a file operation on `path`.
pub fn file_begin(path: &str, op: FileOp) {
    let flags = lifecycle::flags();
    if flags.is_empty() {
        return;
    }
    let Some(state) = lifecycle::state() else {
        return;
    };

    let ts = Timestamp::now();

    context::with_context(|ctx| {
        if flags.contains(TraceFlags::ECHO) {
            if let Some(echo) = state.echo() {
                echo.file_begin(ts, state.process_name(), &ctx.display_name, ctx.depth, path, op);
            }
        }

        if flags.contains(TraceFlags::BINARY) {
            if let (Some(binary), Some(pid)) = (state.binary(), ctx.process_id()) {
                let file = binary.intern_file(path);
                binary.file_begin(ts, pid, file);
            }
        }
    });
}

/// Record the end of a file operation on `path`. `length`/`offset` are
/// echoed only for [`FileOp::Read`]/[`FileOp::Write`].
pub fn file_end(path: &str, op: FileOp, length: u64, offset: u64) {
    let flags = lifecycle::flags();
    if flags.is_empty() {
        return;
    }
    let Some(state) = lifecycle::state() else {
        return;
    };

    let ts = Timestamp::now();

    context::with_context(|ctx| {
        if flags.contains(TraceFlags::ECHO) {
            if let Some(echo) = state.echo() {
                echo.file_end(ts, state.process_name(), &ctx.display_name, ctx.depth, path, op, length, offset);
            }
        }

        if flags.contains(TraceFlags::BINARY) {
            if let (Some(binary), Some(pid)) = (state.binary(), ctx.process_id()) {
                let file = binary.intern_file(path);
                binary.file_end(ts, pid, file, op.binary_code(), length);
            }
        }
    });
}

/// Record a named counter sample.
pub fn counter(name: &str, value: u64) {
    let flags = lifecycle::flags();
    if flags.is_empty() {
        return;
    }
    let Some(state) = lifecycle::state() else {
        return;
    };

    let ts = Timestamp::now();

    context::with_context(|ctx| {
        if flags.contains(TraceFlags::ECHO) {
            if let Some(echo) = state.echo() {
                echo.counter(ts, state.process_name(), &ctx.display_name, ctx.depth, name, value);
            }
        }

        if flags.contains(TraceFlags::BINARY) {
            if let (Some(binary), Some(pid)) = (state.binary(), ctx.process_id()) {
                let counter_id = binary.intern_counter(name);
                binary.counter(ts, pid, counter_id, value);
            }
        }
    });
}
