// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consistency gate for run snapshots.
//!
//! A snapshot is consistent with a job when every job producing one of that
//! job's inputs is marked complete. Inputs nobody produces are treated as
//! supplied from outside the run and never block.

use crate::run::{Job, MalformedRun, Run};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("job '{job_id}' not found in run")]
    JobNotFound { job_id: String },

    #[error(
        "job '{producer}' produces '{artifact}' for job '{consumer}' but is not marked complete"
    )]
    Inconsistent { producer: String, consumer: String, artifact: String },

    #[error("cannot check run: {0}")]
    Malformed(#[from] MalformedRun),
}

/// Producer of a single output, as last seen while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOwner<'a> {
    pub job_id: &'a str,
    pub complete: bool,
}

/// Map every declared output to the job that produces it.
///
/// When two jobs declare the same output the later one in document order wins
/// and a warning names both.
pub fn output_owners<'a>(jobs: &[Job<'a>]) -> HashMap<&'a str, OutputOwner<'a>> {
    let mut owners = HashMap::new();
    for job in jobs {
        let owner = OutputOwner { job_id: job.id, complete: job.complete };
        for &output in &job.outputs {
            if let Some(previous) = owners.insert(output, owner) {
                tracing::warn!(
                    output,
                    first = previous.job_id,
                    second = owner.job_id,
                    "two jobs share an output"
                );
            }
        }
    }
    owners
}

/// Check that every reverse-dependency of `job_id` is marked complete.
///
/// Only direct producers of the job's inputs are inspected. A job graph with
/// missing or mistyped fields cannot be checked and fails.
pub fn check(run: &Run, job_id: &str) -> Result<(), ConsistencyError> {
    let jobs = run.jobs()?;
    let owners = output_owners(&jobs);

    let Some(job) = jobs.iter().rev().find(|job| job.id == job_id) else {
        tracing::error!(job_id, "could not find job in run");
        return Err(ConsistencyError::JobNotFound { job_id: job_id.to_string() });
    };

    for &input in &job.inputs {
        let Some(owner) = owners.get(input) else {
            continue;
        };
        if !owner.complete {
            tracing::debug!(
                producer = owner.job_id,
                consumer = job_id,
                artifact = input,
                "run inconsistent: reverse-dependency not marked complete"
            );
            return Err(ConsistencyError::Inconsistent {
                producer: owner.job_id.to_string(),
                consumer: job_id.to_string(),
                artifact: input.to_string(),
            });
        }
    }
    Ok(())
}

/// Decides whether a snapshot is usable by the current requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunGate {
    /// Outside any job: every snapshot is accepted.
    Open,
    /// Inside a job of the run: the snapshot must be consistent with it.
    ConsistentWith(String),
}

impl RunGate {
    /// Gate for the current process, from `LIT_JOB_ID`.
    pub fn from_env() -> Self {
        match crate::env::current_job_id() {
            Some(job_id) => RunGate::ConsistentWith(job_id),
            None => RunGate::Open,
        }
    }

    pub fn admit(&self, run: &Run) -> Result<(), ConsistencyError> {
        match self {
            RunGate::Open => Ok(()),
            RunGate::ConsistentWith(job_id) => check(run, job_id),
        }
    }
}

#[cfg(test)]
#[path = "consistency_tests.rs"]
mod tests;
