// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::consistency::RunGate;
use serial_test::serial;

/// Run `f` with the given variables set (or removed), restoring them after.
fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
    let saved: Vec<(String, Option<String>)> =
        vars.iter().map(|(k, _)| (k.to_string(), std::env::var(k).ok())).collect();
    for (key, value) in vars {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    f();
    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(&key, v),
            None => std::env::remove_var(&key),
        }
    }
}

#[test]
#[serial]
fn explicit_cache_dir_wins() {
    with_env(&[(CACHE_DIR_VAR, Some("/tmp/lit-cache")), ("XDG_CACHE_HOME", Some("/xdg"))], || {
        assert_eq!(cache_dir().unwrap(), PathBuf::from("/tmp/lit-cache"));
    });
}

#[test]
#[serial]
fn xdg_cache_home_is_used_next() {
    with_env(&[(CACHE_DIR_VAR, None), ("XDG_CACHE_HOME", Some("/xdg"))], || {
        assert_eq!(cache_dir().unwrap(), PathBuf::from("/xdg/lit"));
    });
}

#[test]
#[serial]
fn home_is_the_last_resort() {
    with_env(&[(CACHE_DIR_VAR, Some("")), ("XDG_CACHE_HOME", None), ("HOME", Some("/home/u"))], || {
        assert_eq!(cache_dir().unwrap(), PathBuf::from("/home/u/.cache/lit"));
    });
}

#[test]
#[serial]
fn no_home_is_an_error() {
    with_env(&[(CACHE_DIR_VAR, None), ("XDG_CACHE_HOME", None), ("HOME", None)], || {
        assert!(matches!(cache_dir(), Err(EnvError::NoCacheDir)));
    });
}

#[test]
#[serial]
fn gate_follows_job_id_variable() {
    with_env(&[(JOB_ID_VAR, Some("build-7"))], || {
        assert_eq!(RunGate::from_env(), RunGate::ConsistentWith("build-7".to_string()));
    });
    with_env(&[(JOB_ID_VAR, Some(""))], || {
        assert_eq!(RunGate::from_env(), RunGate::Open);
    });
    with_env(&[(JOB_ID_VAR, None)], || {
        assert_eq!(RunGate::from_env(), RunGate::Open);
    });
}
