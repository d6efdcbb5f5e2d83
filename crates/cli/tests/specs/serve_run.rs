//! `lit dump-run` against a live `lit serve-run` owner.

use crate::prelude::*;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serde_json::Value;
use std::process::{Child, Stdio};

struct ServedRun {
    child: Child,
}

impl ServedRun {
    fn start(cache: &Cache, run_file: &std::path::Path) -> Self {
        let bin = assert_cmd::cargo::cargo_bin("lit");
        let child = std::process::Command::new(bin)
            .env("LIT_CACHE_DIR", cache.path())
            .arg("serve-run")
            .arg(run_file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let pid_path = cache.file("run-build.pid");
        let expected = child.id().to_string();
        let ready = wait_for(SPEC_WAIT_MAX_MS, || {
            std::fs::read_to_string(&pid_path).map(|s| s.trim() == expected).unwrap_or(false)
        });
        assert!(ready, "serve-run should publish its pid");
        Self { child }
    }

    fn stop(mut self) {
        kill(Pid::from_raw(self.child.id() as i32), Signal::SIGTERM).unwrap();
        let status = self.child.wait().unwrap();
        assert!(status.success(), "serve-run should exit cleanly, got {status}");
    }
}

impl Drop for ServedRun {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn live_owner_dumps_current_run() {
    let cache = Cache::new();
    let source = cache.write_json("source.json", &two_job_run(false));
    let owner = ServedRun::start(&cache, &source);

    assert_eq!(cache.dump_run(&[]), two_job_run(false));
    assert!(cache.file("dumped-run.json").exists());

    // The owner re-reads its source for every request.
    cache.write_json("source.json", &two_job_run(true));
    assert_eq!(cache.dump_run(&[]), two_job_run(true));

    owner.stop();
}

#[test]
fn calling_job_waits_for_its_producer() {
    let cache = Cache::new();
    let source = cache.write_json("source.json", &two_job_run(false));
    let owner = ServedRun::start(&cache, &source);

    let mut cmd = cache.lit();
    cmd.env("LIT_JOB_ID", "b");
    assert_eq!(cache.dump_run_with(cmd, &["--retries", "2"]), Value::Null);

    cache.write_json("source.json", &two_job_run(true));
    let mut cmd = cache.lit();
    cmd.env("LIT_JOB_ID", "b");
    assert_eq!(cache.dump_run_with(cmd, &["--retries", "5"]), two_job_run(true));

    owner.stop();
}

#[test]
fn stopped_owner_leaves_persisted_run() {
    let cache = Cache::new();
    let source = cache.write_json("source.json", &two_job_run(true));
    let owner = ServedRun::start(&cache, &source);
    owner.stop();

    assert!(!cache.file("run-build.pid").exists());
    let persisted: Value =
        serde_json::from_str(&std::fs::read_to_string(cache.file("run.json")).unwrap()).unwrap();
    assert_eq!(persisted, two_job_run(true));

    // Without a PID file there is no owner to ask.
    assert_eq!(cache.dump_run(&[]), Value::Null);
}
