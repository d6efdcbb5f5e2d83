//! `lit dump-run` specs without a live owner.

use crate::prelude::*;
use serde_json::Value;

#[test]
fn no_pid_file_prints_null() {
    let cache = Cache::new();
    assert_eq!(cache.dump_run(&[]), Value::Null);
}

#[test]
fn stale_pid_without_persisted_run_prints_null() {
    let cache = Cache::new();
    std::fs::write(cache.file("run-build.pid"), format!("{}\n", dead_pid())).unwrap();
    assert_eq!(cache.dump_run(&["--retries", "3"]), Value::Null);
}

#[test]
fn stale_pid_prints_persisted_run() {
    let cache = Cache::new();
    std::fs::write(cache.file("run-build.pid"), format!("{}\n", dead_pid())).unwrap();
    let run = two_job_run(true);
    cache.write_json("run.json", &run);

    assert_eq!(cache.dump_run(&[]), run);
}

#[test]
fn persisted_run_inconsistent_with_calling_job_prints_null() {
    let cache = Cache::new();
    std::fs::write(cache.file("run-build.pid"), format!("{}\n", dead_pid())).unwrap();
    cache.write_json("run.json", &two_job_run(false));

    let mut cmd = cache.lit();
    cmd.env("LIT_JOB_ID", "b");
    assert_eq!(cache.dump_run_with(cmd, &[]), Value::Null);

    let mut cmd = cache.lit();
    cmd.env("LIT_JOB_ID", "a");
    assert_eq!(cache.dump_run_with(cmd, &[]), two_job_run(false));
}

#[test]
fn out_file_receives_the_run() {
    let cache = Cache::new();
    std::fs::write(cache.file("run-build.pid"), format!("{}\n", dead_pid())).unwrap();
    let run = two_job_run(true);
    cache.write_json("run.json", &run);
    let out = cache.file("out.json");

    let output = cache
        .lit()
        .args(["dump-run", "--out-file", out.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written, run);
}

#[test]
fn directory_out_file_is_rejected() {
    let cache = Cache::new();
    cache.lit().args(["dump-run", "--out-file", cache.path().to_str().unwrap()]).assert().failure();
}

#[test]
fn persisted_run_is_printed_unchanged() {
    let cache = Cache::new();
    std::fs::write(cache.file("run-build.pid"), format!("{}\n", dead_pid())).unwrap();
    let text = "{\n  \"status\": \"done\",\n  \"pipelines\": [\n    {\n      \"name\": \"p\"\n    }\n  ],\n  \"aux\": 1\n}\n";
    std::fs::write(cache.file("run.json"), text).unwrap();

    let output = cache.lit().arg("dump-run").assert().success().get_output().clone();
    assert_eq!(String::from_utf8(output.stdout).unwrap(), text);
}
