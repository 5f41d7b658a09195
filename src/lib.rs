//! Hierarchical function/file/counter tracing core with pluggable sinks.
//!
//! Record hierarchical function-entry/exit, file-operation, and counter
//! events across many concurrent threads, fanned out to zero or more
//! back-ends (line-oriented echo, a binary trace stream, an in-memory
//! aggregated summary). Entirely inert — a single relaxed atomic load —
//! when tracing is off.
//!
//! Configure with the `JULEA_TRACE` (comma-separated subset of `echo`,
//! `otf`, `summary`) and `JULEA_TRACE_FUNCTION` (comma-separated glob
//! list) environment variables, read once at [`init`].
//!
//! ```no_run
//! jtrace::init("my-process");
//! let span = jtrace::enter("do_work");
//! // ... do work ...
//! jtrace::leave(span);
//! jtrace::fini();
//! ```

mod context;
mod domain;
mod dispatch;
mod filter;
mod lifecycle;
mod sinks;

pub use domain::FileOp;
pub use dispatch::{counter, enter, enter_fmt, file_begin, file_end, leave, Span};
pub use lifecycle::{fini, init};

/// Begin a span with a deferred-formatted argument list, e.g.
/// `trace_enter!("read_block", "offset={}, length={}", offset, length)`.
/// Equivalent to [`enter_fmt`] but builds the `format_args!` at the call
/// site instead of requiring the caller to do so.
#[macro_export]
macro_rules! trace_enter {
    ($name:expr) => {
        $crate::enter($name)
    };
    ($name:expr, $fmt:expr $(, $args:expr)* $(,)?) => {
        $crate::enter_fmt($name, format_args!($fmt $(, $args)*))
    };
}
