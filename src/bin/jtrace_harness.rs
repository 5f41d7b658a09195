//! Out-of-process scenario runner for the integration tests.
//!
//! `jtrace::init`/`jtrace::fini` touch true process-global state (a
//! `OnceLock`, a couple of `AtomicU8`/`AtomicU32`s), so only one scenario
//! can safely run per process. The integration tests under `tests/`
//! exercise real end-to-end behavior by spawning this binary once per
//! scenario, setting `JULEA_TRACE`/`JULEA_TRACE_FUNCTION` and a working
//! directory, and inspecting its stdout/stderr/exit code and any
//! `*.jtrace` file it leaves behind.

use std::thread;
use std::time::Duration;

use jtrace::FileOp;

fn main() {
    let scenario = std::env::args().nth(1).unwrap_or_default();
    jtrace::init("harness");

    match scenario.as_str() {
        "s1_echo" => s1_echo(),
        "s2_summary" => s2_summary(),
        "s3_filter" => s3_filter(),
        "s4_counter" => s4_counter(),
        "s5_file_ops" => s5_file_ops(),
        "inertness" => inertness(),
        "thread_isolation" => thread_isolation(),
        "perf_smoke" => perf_smoke(),
        other => {
            eprintln!("unknown scenario {other:?}");
            std::process::exit(2);
        }
    }

    jtrace::fini();
}

fn s1_echo() {
    let outer = jtrace::enter("outer");
    let inner = jtrace::enter_fmt("inner", format_args!("x={}", 1));
    jtrace::leave(inner);
    jtrace::leave(outer);
}

fn s2_summary() {
    for _ in 0..3 {
        let a = jtrace::enter("a");
        let b = jtrace::enter("b");
        thread::sleep(Duration::from_millis(1));
        jtrace::leave(b);
        jtrace::leave(a);
    }
}

fn s3_filter() {
    let wanted = jtrace::enter("wanted");
    jtrace::leave(wanted);

    let unwanted = jtrace::enter("unwanted");
    assert!(unwanted.is_none(), "filtered-out name must not produce a span");
    jtrace::leave(unwanted);
}

fn s4_counter() {
    jtrace::counter("cache_hits", 42);
}

fn s5_file_ops() {
    jtrace::file_begin("/tmp/data", FileOp::Read);
    jtrace::file_end("/tmp/data", FileOp::Read, 128, 1024);

    jtrace::file_begin("/tmp/data", FileOp::Close);
    jtrace::file_end("/tmp/data", FileOp::Close, 0, 0);
}

fn inertness() {
    for _ in 0..5 {
        let span = jtrace::enter("anything");
        assert!(span.is_none(), "enter must return None while tracing is off");
        jtrace::leave(span);
    }
    jtrace::counter("ignored", 1);
    jtrace::file_begin("/tmp/ignored", FileOp::Read);
    jtrace::file_end("/tmp/ignored", FileOp::Read, 0, 0);
}

fn thread_isolation() {
    let handles: Vec<_> = (0..2)
        .map(|i| {
            thread::spawn(move || {
                let outer = jtrace::enter(&format!("worker{i}"));
                thread::sleep(Duration::from_millis(2));
                let inner = jtrace::enter("step");
                jtrace::leave(inner);
                jtrace::leave(outer);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

fn perf_smoke() {
    for i in 0..1000 {
        let span = jtrace::enter("hot_path");
        if i % 100 == 0 {
            jtrace::counter("iterations", i);
        }
        jtrace::leave(span);
    }
}
