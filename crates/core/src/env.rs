// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;
use thiserror::Error;

/// Carries the id of the job the current process runs as, if any.
pub const JOB_ID_VAR: &str = "LIT_JOB_ID";
/// Overrides the cache directory shared by the owner and requesters.
pub const CACHE_DIR_VAR: &str = "LIT_CACHE_DIR";
/// Log filter for the `lit` binary (`tracing_subscriber::EnvFilter` syntax).
pub const LOG_VAR: &str = "LIT_LOG";

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("could not determine cache directory: set {CACHE_DIR_VAR} or HOME")]
    NoCacheDir,
}

/// Resolve cache directory: LIT_CACHE_DIR > XDG_CACHE_HOME/lit > ~/.cache/lit
pub fn cache_dir() -> Result<PathBuf, EnvError> {
    if let Some(dir) = non_empty(CACHE_DIR_VAR) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_CACHE_HOME") {
        return Ok(PathBuf::from(xdg).join("lit"));
    }
    let home = non_empty("HOME").ok_or(EnvError::NoCacheDir)?;
    Ok(PathBuf::from(home).join(".cache/lit"))
}

/// Id of the job this process runs as, when launched inside a run.
pub fn current_job_id() -> Option<String> {
    non_empty(JOB_ID_VAR)
}

/// Log filter directive, when set.
pub fn log_filter() -> Option<String> {
    non_empty(LOG_VAR)
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
