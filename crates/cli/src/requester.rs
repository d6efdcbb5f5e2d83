// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requester side of the run snapshot handshake.
//!
//! Signal the owner, poll the cache directory for the snapshot it writes, and
//! accept the first one that passes the gate. When the owner is gone the
//! persisted run is the only candidate and it is tried exactly once.

use lit_core::pid_file;
use lit_core::{
    BackoffSleeper, CacheLayout, ConsistencyError, DumpNotifier, NotifyError, PidFileError, Run,
    RunGate, Sleeper, SnapshotError,
};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Where an emitted run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSource {
    /// Snapshot the live owner wrote on request
    Dumped,
    /// Final run file of an owner that has exited
    Persisted,
}

/// Why no run was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullReason {
    /// No PID file: no owner to ask
    MissingOwner,
    /// Owner exited and its persisted run is missing or unusable
    OwnerGone,
    /// Every attempt produced an unusable snapshot
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DumpOutcome {
    Found { run: Run, source: RunSource },
    Null(NullReason),
}

/// A candidate run file that cannot be emitted yet.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("snapshot unavailable: {0}")]
    Unavailable(#[from] SnapshotError),
    #[error("snapshot rejected: {0}")]
    Rejected(#[from] ConsistencyError),
}

pub struct DumpRequester<N, S> {
    layout: CacheLayout,
    gate: RunGate,
    notifier: N,
    backoff: BackoffSleeper<S>,
}

impl<N: DumpNotifier, S: Sleeper> DumpRequester<N, S> {
    pub fn new(layout: CacheLayout, gate: RunGate, notifier: N, backoff: BackoffSleeper<S>) -> Self {
        Self { layout, gate, notifier, backoff }
    }

    /// Obtain a run, making at most `retries` attempts (unbounded when zero).
    pub fn run(&mut self, retries: u32) -> DumpOutcome {
        let pid = match pid_file::read(&self.layout.pid_path) {
            Ok(pid) => pid,
            Err(PidFileError::NotFound(path)) => {
                debug!(path = %path, "no owner PID file");
                return DumpOutcome::Null(NullReason::MissingOwner);
            }
            Err(e) => {
                warn!(error = %e, "could not read owner PID");
                return DumpOutcome::Null(NullReason::MissingOwner);
            }
        };

        let mut attempt: u32 = 0;
        while retries == 0 || attempt < retries {
            attempt += 1;
            if let Some(outcome) = self.attempt(pid, attempt) {
                return outcome;
            }
            self.backoff.sleep();
        }
        debug!(attempts = attempt, "no usable snapshot");
        DumpOutcome::Null(NullReason::Exhausted)
    }

    /// One signal-and-poll round. `None` means try again after backing off.
    fn attempt(&self, pid: u32, attempt: u32) -> Option<DumpOutcome> {
        match self.notifier.request_dump(pid) {
            Ok(()) => {}
            Err(NotifyError::ProcessNotFound(_)) => {
                debug!(pid, "pid does not match a running process");
                return Some(self.persisted_run());
            }
            // Not fatal: a snapshot from an earlier request may still be usable.
            Err(e) => warn!(pid, error = %e, "could not deliver dump request"),
        }

        match self.load_admitted(&self.layout.dumped_run_path) {
            Ok(run) => Some(DumpOutcome::Found { run, source: RunSource::Dumped }),
            Err(e) => {
                debug!(attempt, error = %e, "dumped run not usable yet");
                None
            }
        }
    }

    /// Fallback once the owner has exited. A dead owner writes nothing newer,
    /// so this is never retried.
    fn persisted_run(&self) -> DumpOutcome {
        match self.load_admitted(&self.layout.run_path) {
            Ok(run) => DumpOutcome::Found { run, source: RunSource::Persisted },
            Err(e) => {
                warn!(error = %e, "could not use the persisted run of the exited owner");
                DumpOutcome::Null(NullReason::OwnerGone)
            }
        }
    }

    fn load_admitted(&self, path: &Path) -> Result<Run, PollError> {
        let run = Run::load(path)?;
        self.gate.admit(&run)?;
        Ok(run)
    }

    #[cfg(test)]
    pub fn backoff(&self) -> &BackoffSleeper<S> {
        &self.backoff
    }
}

#[cfg(test)]
#[path = "requester_tests.rs"]
mod tests;
