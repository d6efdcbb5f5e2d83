// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lit dump-run` - Signal the run owner to dump its run and print it

use crate::output::emit;
use crate::requester::{DumpOutcome, DumpRequester, NullReason};
use anyhow::Result;
use clap::Args;
use lit_core::{BackoffSleeper, CacheLayout, RunGate, SignalNotifier};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DumpRunArgs {
    /// How many times to signal the owner and poll for its snapshot (0 retries without bound)
    #[arg(short = 'r', long, value_name = "N", default_value_t = 10)]
    pub retries: u32,

    /// Write the run to this file instead of stdout
    #[arg(short = 'o', long, value_name = "F", value_parser = non_directory_path)]
    pub out_file: Option<PathBuf>,
}

pub fn dump_run(args: DumpRunArgs) -> Result<()> {
    let outcome = match CacheLayout::load() {
        Ok(layout) => {
            let backoff = BackoffSleeper::from_rng(&mut rand::thread_rng());
            let mut requester =
                DumpRequester::new(layout, RunGate::from_env(), SignalNotifier, backoff);
            requester.run(args.retries)
        }
        Err(e) => {
            tracing::warn!(error = %e, "no cache directory to look for an owner in");
            DumpOutcome::Null(NullReason::MissingOwner)
        }
    };

    match &outcome {
        DumpOutcome::Found { source, .. } => tracing::debug!(?source, "run obtained"),
        DumpOutcome::Null(reason) => tracing::debug!(?reason, "no run obtained"),
    }
    if let Err(e) = emit(&outcome, args.out_file.as_deref(), &mut std::io::stdout().lock()) {
        tracing::error!(error = %e, "could not write to stdout");
    }
    Ok(())
}

fn non_directory_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        return Err(format!("'{value}' is a directory"));
    }
    Ok(path)
}

#[cfg(test)]
#[path = "dump_run_tests.rs"]
mod tests;
