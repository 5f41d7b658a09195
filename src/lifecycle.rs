//! Process-wide tracing state machine: `init`/`fini` and the flag word the
//! hot path checks.
//!
//! All process-wide mutable state (flags, sinks, filter, counters) is
//! modeled as fields of a single [`State`] built once in [`init`] behind a
//! `OnceLock`, per the original design notes' "don't scatter globals"
//! guidance — except the flag word itself, which stays a bare `AtomicU8`
//! outside `State` so the inert fast path is a single relaxed load with no
//! `OnceLock` indirection.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};
use std::thread::ThreadId;

use crate::domain::TraceError;
use crate::filter::Filter;
use crate::sinks::{BinarySink, EchoSink, SummarySink};

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct TraceFlags: u8 {
        const ECHO    = 1 << 0;
        const BINARY  = 1 << 1;
        const SUMMARY = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Off,
    Active,
    Terminated,
}

pub(crate) struct State {
    process_name: String,
    filter: Option<Filter>,
    echo: Option<EchoSink>,
    binary: Option<BinarySink>,
    summary: Option<SummarySink>,
}

impl State {
    pub(crate) fn process_name(&self) -> &str {
        &self.process_name
    }

    pub(crate) fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub(crate) fn echo(&self) -> Option<&EchoSink> {
        self.echo.as_ref()
    }

    pub(crate) fn binary(&self) -> Option<&BinarySink> {
        self.binary.as_ref()
    }

    pub(crate) fn summary(&self) -> Option<&SummarySink> {
        self.summary.as_ref()
    }
}

static FLAGS: AtomicU8 = AtomicU8::new(0);
static PHASE: Mutex<Phase> = Mutex::new(Phase::Uninitialized);
static STATE: OnceLock<State> = OnceLock::new();
static MAIN_THREAD: OnceLock<ThreadId> = OnceLock::new();
static NEXT_THREAD_SEQ: AtomicU32 = AtomicU32::new(1);

/// Single relaxed load: the entire cost of tracing being off.
pub(crate) fn flags() -> TraceFlags {
    TraceFlags::from_bits_truncate(FLAGS.load(Ordering::Relaxed))
}

pub(crate) fn state() -> Option<&'static State> {
    STATE.get()
}

pub(crate) fn is_main_thread() -> bool {
    matches!(MAIN_THREAD.get(), Some(id) if *id == std::thread::current().id())
}

pub(crate) fn next_thread_seq() -> u32 {
    NEXT_THREAD_SEQ.fetch_add(1, Ordering::Relaxed)
}

fn parse_trace_env(spec: &str) -> TraceFlags {
    let mut flags = TraceFlags::empty();
    for token in spec.split(',') {
        match token.trim() {
            "echo" => flags |= TraceFlags::ECHO,
            "otf" => flags |= TraceFlags::BINARY,
            "summary" => flags |= TraceFlags::SUMMARY,
            "" => {}
            other => log::debug!("JULEA_TRACE: ignoring unknown token {other:?}"),
        }
    }
    flags
}

/// Initialize tracing for the process. Must be called at most once, before
/// any other tracing call that should be observed. Reads `JULEA_TRACE` and
/// `JULEA_TRACE_FUNCTION` from the environment; see the crate docs for
/// their grammar.
pub fn init(process_name: &str) {
    let mut phase = PHASE.lock().unwrap_or_else(|e| e.into_inner());
    if *phase != Phase::Uninitialized {
        log::warn!("jtrace: {}; ignoring", TraceError::AlreadyInitialized);
        return;
    }

    let mut flags = match std::env::var("JULEA_TRACE") {
        Ok(spec) => parse_trace_env(&spec),
        Err(_) => TraceFlags::empty(),
    };

    if flags.is_empty() {
        *phase = Phase::Off;
        return;
    }

    let filter = std::env::var("JULEA_TRACE_FUNCTION")
        .ok()
        .map(|spec| Filter::parse(&spec));

    let binary = if flags.contains(TraceFlags::BINARY) {
        match BinarySink::new(process_name) {
            Ok(sink) => Some(sink),
            Err(e) => {
                log::warn!("jtrace: failed to open binary trace sink: {e}");
                flags.remove(TraceFlags::BINARY);
                None
            }
        }
    } else {
        None
    };

    let echo = flags.contains(TraceFlags::ECHO).then(EchoSink::new);
    let summary = flags.contains(TraceFlags::SUMMARY).then(SummarySink::new);

    if flags.is_empty() {
        *phase = Phase::Off;
        return;
    }

    let _ = MAIN_THREAD.set(std::thread::current().id());
    let _ = STATE.set(State {
        process_name: process_name.to_string(),
        filter,
        echo,
        binary,
        summary,
    });

    FLAGS.store(flags.bits(), Ordering::Release);
    *phase = Phase::Active;
}

/// Tear tracing down: flush the summary sink, close the binary sink, and
/// go inert. A no-op (with a warning) unless `init` was previously called.
pub fn fini() {
    let mut phase = PHASE.lock().unwrap_or_else(|e| e.into_inner());
    match *phase {
        Phase::Active | Phase::Off => {}
        Phase::Uninitialized | Phase::Terminated => {
            log::warn!("jtrace: {}; ignoring fini", TraceError::NotInitialized);
            return;
        }
    }

    // Flip the hot-path flag first so anything racing teardown degrades to
    // inert rather than touching a half-torn-down sink.
    FLAGS.store(0, Ordering::Release);

    if let Some(state) = STATE.get() {
        if let Some(binary) = state.binary() {
            binary.close();
        }
        if let Some(summary) = state.summary() {
            summary.dump(&mut std::io::stderr());
        }
    }

    *phase = Phase::Terminated;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trace_env_recognizes_known_tokens() {
        let flags = parse_trace_env("echo,otf,summary");
        assert!(flags.contains(TraceFlags::ECHO));
        assert!(flags.contains(TraceFlags::BINARY));
        assert!(flags.contains(TraceFlags::SUMMARY));
    }

    #[test]
    fn parse_trace_env_ignores_unknown_tokens() {
        let flags = parse_trace_env("echo,bogus");
        assert_eq!(flags, TraceFlags::ECHO);
    }

    #[test]
    fn parse_trace_env_empty_is_off() {
        assert!(parse_trace_env("").is_empty());
    }
}
