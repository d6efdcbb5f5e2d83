//! Shared helpers for `lit` specs.

use assert_cmd::Command;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;


pub const SPEC_WAIT_MAX_MS: u64 = 10_000;

/// A scratch cache directory with helpers to run `lit` against it.
pub struct Cache {
    dir: TempDir,
}

impl Cache {
    pub fn new() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.file(name);
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    /// `lit` with this cache directory and no inherited job id.
    pub fn lit(&self) -> Command {
        let mut cmd = Command::cargo_bin("lit").unwrap();
        cmd.env("LIT_CACHE_DIR", self.path()).env_remove("LIT_JOB_ID").env_remove("LIT_LOG");
        cmd
    }

    /// Run `lit dump-run <args>` and parse its stdout, asserting exit status 0.
    pub fn dump_run(&self, args: &[&str]) -> Value {
        self.dump_run_with(self.lit(), args)
    }

    pub fn dump_run_with(&self, mut cmd: Command, args: &[&str]) -> Value {
        let output = cmd.arg("dump-run").args(args).assert().success().get_output().clone();
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

/// Producer `a` of `x`, consumer `b` of `x`.
pub fn two_job_run(a_complete: bool) -> Value {
    json!({
        "status": "in_progress",
        "pipelines": [{
            "name": "proofs",
            "ci_stages": [
                { "name": "build", "jobs": [{
                    "complete": a_complete,
                    "wrapper_arguments": { "job_id": "a", "inputs": null, "outputs": ["x"] }
                }]},
                { "name": "test", "jobs": [{
                    "complete": false,
                    "wrapper_arguments": { "job_id": "b", "inputs": ["x"], "outputs": null }
                }]}
            ]
        }]
    })
}

/// Pid of a process that has already exited.
pub fn dead_pid() -> u32 {
    let mut child = std::process::Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();
    pid
}

/// Poll `check` until it returns true or `max_ms` elapses.
pub fn wait_for<F: FnMut() -> bool>(max_ms: u64, mut check: F) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    check()
}
