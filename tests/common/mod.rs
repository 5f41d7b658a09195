//! Shared helper for spawning the scenario harness as its own process.

use std::path::Path;
use std::process::{Command, Output};

pub struct Harness {
    cmd: Command,
}

impl Harness {
    pub fn new(scenario: &str, dir: &Path) -> Self {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jtrace_harness"));
        cmd.arg(scenario);
        cmd.current_dir(dir);
        cmd.env_remove("JULEA_TRACE");
        cmd.env_remove("JULEA_TRACE_FUNCTION");
        Harness { cmd }
    }

    pub fn trace(mut self, spec: &str) -> Self {
        self.cmd.env("JULEA_TRACE", spec);
        self
    }

    pub fn filter(mut self, spec: &str) -> Self {
        self.cmd.env("JULEA_TRACE_FUNCTION", spec);
        self
    }

    pub fn run(mut self) -> Output {
        self.cmd.output().expect("failed to spawn jtrace_harness")
    }
}

pub fn stderr_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .map(str::to_string)
        .collect()
}
