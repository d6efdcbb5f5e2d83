// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = read(&dir.path().join("run-build.pid"));
    assert!(matches!(result, Err(PidFileError::NotFound(_))));
}

#[yare::parameterized(
    plain    = { "4242",   4242 },
    newline  = { "4242\n", 4242 },
    padded   = { "  17 \n", 17 },
)]
fn reads_recorded_pid(content: &str, expected: u32) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run-build.pid");
    std::fs::write(&path, content).unwrap();
    assert_eq!(read(&path).unwrap(), expected);
}

#[yare::parameterized(
    empty    = { "" },
    garbage  = { "not-a-pid" },
    negative = { "-3" },
    zero     = { "0" },
)]
fn rejects_invalid_contents(content: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run-build.pid");
    std::fs::write(&path, content).unwrap();
    assert!(matches!(read(&path), Err(PidFileError::Invalid { .. })));
}

#[test]
fn write_truncates_previous_pid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run-build.pid");
    std::fs::write(&path, "123456789\n").unwrap();

    let mut file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    write(&mut file, 42).unwrap();
    drop(file);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "42\n");
    assert_eq!(read(&path).unwrap(), 42);
}

#[test]
fn rejects_ids_beyond_pid_range() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run-build.pid");
    std::fs::write(&path, "4294967295").unwrap();
    assert!(matches!(read(&path), Err(PidFileError::Invalid { .. })));
}
