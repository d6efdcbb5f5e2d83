// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sources of the live run document.
//!
//! The persister asks a [`ReportBuilder`] for the run on every dump request,
//! so whatever it returns must reflect scheduler state at call time.

use lit_core::{Run, SnapshotError};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("run source unavailable: {0}")]
    Source(#[from] SnapshotError),
}

/// Builds the current run document on demand.
pub trait ReportBuilder: Send + Sync + 'static {
    fn current_run(&self) -> Result<Run, ReportError>;
}

/// In-memory run shared with the scheduler that mutates it.
#[derive(Clone, Default)]
pub struct SharedRun {
    inner: Arc<Mutex<Run>>,
}

impl SharedRun {
    pub fn new(run: Run) -> Self {
        Self { inner: Arc::new(Mutex::new(run)) }
    }

    /// Apply a mutation under the lock.
    pub fn update<F: FnOnce(&mut Run)>(&self, f: F) {
        f(&mut self.inner.lock());
    }

    /// Mark every job with `job_id` complete. Returns whether one was found.
    pub fn mark_complete(&self, job_id: &str) -> bool {
        self.inner.lock().set_complete(job_id, true)
    }
}

impl ReportBuilder for SharedRun {
    fn current_run(&self) -> Result<Run, ReportError> {
        Ok(self.inner.lock().clone())
    }
}

/// Run document kept on disk by another component; re-read on every request.
#[derive(Debug, Clone)]
pub struct RunFileSource {
    path: PathBuf,
}

impl RunFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportBuilder for RunFileSource {
    fn current_run(&self) -> Result<Run, ReportError> {
        Ok(Run::load(&self.path)?)
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
