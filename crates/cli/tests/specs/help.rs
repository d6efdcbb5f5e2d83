//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    let cache = Cache::new();
    let output = cache.lit().arg("--help").assert().success().get_output().clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("dump-run"));
    assert!(stdout.contains("serve-run"));
}

#[test]
fn dump_run_help_documents_flags() {
    let cache = Cache::new();
    let output =
        cache.lit().args(["dump-run", "--help"]).assert().success().get_output().clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--retries"));
    assert!(stdout.contains("--out-file"));
}
