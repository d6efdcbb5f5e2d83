// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::run::Run;
use serde_json::{json, Map, Value};

pub use crate::backoff::FakeSleeper;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for run documents.
pub mod strategies {
    use super::{job, RunBuilder};
    use crate::run::Run;
    use proptest::prelude::*;

    /// Artifacts produced inside generated runs are named `out-N`.
    pub const PRODUCED: &str = "out-";
    /// Artifacts nobody in a generated run produces are named `src-N`.
    pub const EXTERNAL: &str = "src-";

    /// A single-stage run of `job-0..job-N` where each job produces `out-i`,
    /// reads a random subset of `src-*` artifacts and has a random `complete`
    /// flag.
    pub fn arb_run_with_external_inputs() -> impl Strategy<Value = Run> {
        prop::collection::vec((any::<bool>(), prop::collection::vec(0u8..8, 0..4)), 1..6)
            .prop_map(|jobs| {
                let mut builder = RunBuilder::new();
                for (i, (complete, sources)) in jobs.into_iter().enumerate() {
                    let inputs: Vec<String> =
                        sources.iter().map(|n| format!("{EXTERNAL}{n}")).collect();
                    builder = builder.job(
                        job(&format!("job-{i}"))
                            .inputs(inputs)
                            .outputs([format!("{PRODUCED}{i}")])
                            .complete(complete),
                    );
                }
                builder.build()
            })
    }
}

// ── Run builders ────────────────────────────────────────────────────────

/// Start building a job with the given id.
pub fn job(id: &str) -> JobBuilder {
    JobBuilder { id: id.to_string(), inputs: None, outputs: None, complete: false }
}

pub struct JobBuilder {
    id: String,
    inputs: Option<Vec<String>>,
    outputs: Option<Vec<String>>,
    complete: bool,
}

impl JobBuilder {
    pub fn inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = Some(inputs.into_iter().map(Into::into).collect());
        self
    }

    pub fn outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = Some(outputs.into_iter().map(Into::into).collect());
        self
    }

    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    /// The job as it appears in a run document. Unset lists are left out.
    pub fn build(self) -> Value {
        let mut args = Map::new();
        args.insert("job_id".to_string(), json!(self.id));
        if let Some(inputs) = self.inputs {
            args.insert("inputs".to_string(), json!(inputs));
        }
        if let Some(outputs) = self.outputs {
            args.insert("outputs".to_string(), json!(outputs));
        }
        json!({ "complete": self.complete, "wrapper_arguments": args })
    }
}

/// Builds runs stage by stage. Jobs land in the most recent stage of the most
/// recent pipeline, creating both on first use.
#[derive(Default)]
pub struct RunBuilder {
    pipelines: Vec<Vec<Vec<Value>>>,
}

impl RunBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pipeline(mut self) -> Self {
        self.pipelines.push(Vec::new());
        self
    }

    pub fn stage(mut self) -> Self {
        self.current_pipeline().push(Vec::new());
        self
    }

    pub fn job(mut self, job: JobBuilder) -> Self {
        self.current_stage().push(job.build());
        self
    }

    pub fn build(self) -> Run {
        let pipelines = self
            .pipelines
            .into_iter()
            .map(|stages| {
                let stages: Vec<Value> =
                    stages.into_iter().map(|jobs| json!({ "jobs": jobs })).collect();
                json!({ "ci_stages": stages })
            })
            .collect();
        Run::new(pipelines)
    }

    fn current_pipeline(&mut self) -> &mut Vec<Vec<Value>> {
        if self.pipelines.is_empty() {
            self.pipelines.push(Vec::new());
        }
        let last = self.pipelines.len() - 1;
        &mut self.pipelines[last]
    }

    fn current_stage(&mut self) -> &mut Vec<Value> {
        let pipeline = self.current_pipeline();
        if pipeline.is_empty() {
            pipeline.push(Vec::new());
        }
        let last = pipeline.len() - 1;
        &mut pipeline[last]
    }
}

/// Producer `a` of artifact `x` and consumer `b` of it, with the given flags.
pub fn producer_consumer(producer_complete: bool, consumer_complete: bool) -> Run {
    RunBuilder::new()
        .stage()
        .job(job("a").outputs(["x"]).complete(producer_complete))
        .stage()
        .job(job("b").inputs(["x"]).complete(consumer_complete))
        .build()
}
