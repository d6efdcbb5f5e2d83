// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run document: the execution graph of one build session.
//!
//! A run is kept as the JSON object the owner produced, key order included,
//! so a snapshot passes through the requester unchanged. The only structural
//! requirement is a `pipelines` key. The job graph is read on demand through
//! [`Run::jobs`], which is where missing or mistyped fields surface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// Errors reading a run document from disk.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("run file not found: {0}")]
    Missing(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed run document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not a run document: {0}")]
    NotARun(&'static str),
}

/// The job graph of a run does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at {path}")]
pub struct MalformedRun {
    pub path: String,
    pub expected: &'static str,
}

fn malformed(path: String, expected: &'static str) -> MalformedRun {
    MalformedRun { path, expected }
}

/// Root document of a build session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Run {
    doc: Map<String, Value>,
}

impl Default for Run {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TryFrom<Value> for Run {
    type Error = SnapshotError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(doc) if doc.contains_key("pipelines") => Ok(Self { doc }),
            Value::Object(_) => Err(SnapshotError::NotARun("no `pipelines` field")),
            _ => Err(SnapshotError::NotARun("not a JSON object")),
        }
    }
}

impl Serialize for Run {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.doc.serialize(serializer)
    }
}

impl From<Run> for Value {
    fn from(run: Run) -> Self {
        Value::Object(run.doc)
    }
}

/// One job of a run, read from the fields the consistency gate needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job<'a> {
    pub id: &'a str,
    pub complete: bool,
    /// Declared inputs, empty when absent or null
    pub inputs: Vec<&'a str>,
    /// Declared outputs, empty when absent or null
    pub outputs: Vec<&'a str>,
}

impl<'a> Job<'a> {
    fn parse(job: &'a Value, path: &str) -> Result<Self, MalformedRun> {
        let args = job
            .get("wrapper_arguments")
            .filter(|args| args.is_object())
            .ok_or_else(|| malformed(format!("{path}.wrapper_arguments"), "an object"))?;
        let id = args
            .get("job_id")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(format!("{path}.wrapper_arguments.job_id"), "a string"))?;
        let complete = job
            .get("complete")
            .and_then(Value::as_bool)
            .ok_or_else(|| malformed(format!("{path}.complete"), "a boolean"))?;
        Ok(Self {
            id,
            complete,
            inputs: string_list(args.get("inputs"), || format!("{path}.wrapper_arguments.inputs"))?,
            outputs: string_list(args.get("outputs"), || {
                format!("{path}.wrapper_arguments.outputs")
            })?,
        })
    }
}

fn array<'a>(
    value: Option<&'a Value>,
    path: impl FnOnce() -> String,
) -> Result<&'a [Value], MalformedRun> {
    value.and_then(Value::as_array).map(Vec::as_slice).ok_or_else(|| malformed(path(), "an array"))
}

fn string_list<'a>(
    value: Option<&'a Value>,
    path: impl Fn() -> String,
) -> Result<Vec<&'a str>, MalformedRun> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().ok_or_else(|| malformed(format!("{}[{i}]", path()), "a string"))
            })
            .collect(),
        Some(_) => Err(malformed(path(), "a list of strings or null")),
    }
}

impl Run {
    /// A run with the given pipelines and nothing else.
    pub fn new(pipelines: Vec<Value>) -> Self {
        let mut doc = Map::new();
        doc.insert("pipelines".to_string(), Value::Array(pipelines));
        Self { doc }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    /// Set a top-level field, keeping its position when it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.doc.insert(key.into(), value)
    }

    /// Every job of every stage of every pipeline, in document order.
    pub fn jobs(&self) -> Result<Vec<Job<'_>>, MalformedRun> {
        let mut jobs = Vec::new();
        let pipelines = array(self.doc.get("pipelines"), || "pipelines".to_string())?;
        for (p, pipeline) in pipelines.iter().enumerate() {
            let stages =
                array(pipeline.get("ci_stages"), || format!("pipelines[{p}].ci_stages"))?;
            for (s, stage) in stages.iter().enumerate() {
                let stage_path = format!("pipelines[{p}].ci_stages[{s}]");
                for (j, job) in array(stage.get("jobs"), || format!("{stage_path}.jobs"))?
                    .iter()
                    .enumerate()
                {
                    jobs.push(Job::parse(job, &format!("{stage_path}.jobs[{j}]"))?);
                }
            }
        }
        Ok(jobs)
    }

    /// Last job with `job_id`, if the job graph is readable.
    #[cfg(any(test, feature = "test-support"))]
    pub fn job(&self, job_id: &str) -> Option<Job<'_>> {
        self.jobs().ok()?.into_iter().rev().find(|job| job.id == job_id)
    }

    /// Set `complete` on every job with `job_id`. Returns whether one was found.
    ///
    /// Jobs the graph walk cannot reach are left alone.
    pub fn set_complete(&mut self, job_id: &str, complete: bool) -> bool {
        let mut found = false;
        let jobs = self
            .doc
            .get_mut("pipelines")
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(|pipeline| pipeline.get_mut("ci_stages").and_then(Value::as_array_mut))
            .flatten()
            .filter_map(|stage| stage.get_mut("jobs").and_then(Value::as_array_mut))
            .flatten();
        for job in jobs {
            if job.pointer("/wrapper_arguments/job_id").and_then(Value::as_str) != Some(job_id) {
                continue;
            }
            if let Some(fields) = job.as_object_mut() {
                fields.insert("complete".to_string(), Value::Bool(complete));
                found = true;
            }
        }
        found
    }

    /// Load a run document from `path`.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SnapshotError::Missing(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Run::try_from(serde_json::from_str::<Value>(&content)?)
    }

    /// Indented JSON with a trailing newline, as written to disk and stdout.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(&self.doc)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
