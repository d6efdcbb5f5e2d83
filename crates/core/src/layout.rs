// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Well-known files inside the cache directory.

use crate::env::{self, EnvError};
use std::path::{Path, PathBuf};

/// Transient snapshot the owner rewrites on every dump request.
pub const DUMPED_RUN: &str = "dumped-run.json";
/// Durable run file the owner writes as it finishes.
pub const RUN_FILE: &str = "run.json";
/// Owner process id.
pub const PID_FILE: &str = "run-build.pid";

/// Paths shared by the owner and every requester of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    /// Root cache directory
    pub cache_dir: PathBuf,
    /// Path to the dumped snapshot
    pub dumped_run_path: PathBuf,
    /// Path to the persisted run
    pub run_path: PathBuf,
    /// Path to the owner PID file
    pub pid_path: PathBuf,
}

impl CacheLayout {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        let cache_dir = cache_dir.into();
        Self {
            dumped_run_path: cache_dir.join(DUMPED_RUN),
            run_path: cache_dir.join(RUN_FILE),
            pid_path: cache_dir.join(PID_FILE),
            cache_dir,
        }
    }

    /// Layout for the cache directory resolved from the environment.
    pub fn load() -> Result<Self, EnvError> {
        Ok(Self::new(env::cache_dir()?))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}
