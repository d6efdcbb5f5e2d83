// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Emitting the outcome of a dump request.
//!
//! A found run is printed as indented JSON, or written atomically to the
//! requested output file. Anything else is the JSON token `null` on stdout.
//! Callers tell the two apart by the body, never by exit status.

use std::io::Write;
use std::path::Path;

use crate::requester::DumpOutcome;
use lit_core::atomic_write;
use tracing::error;

const NULL: &str = "null\n";

/// Write `outcome` to `out_file` (when given and a run was found) or `stdout`.
pub fn emit(outcome: &DumpOutcome, out_file: Option<&Path>, stdout: &mut impl Write) -> std::io::Result<()> {
    let json = match outcome {
        DumpOutcome::Found { run, .. } => match run.to_pretty_json() {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "could not serialize run");
                return stdout.write_all(NULL.as_bytes());
            }
        },
        DumpOutcome::Null(_) => return stdout.write_all(NULL.as_bytes()),
    };

    match out_file {
        None => stdout.write_all(json.as_bytes()),
        Some(path) => match atomic_write(path, json.as_bytes()) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not write run to output file");
                stdout.write_all(NULL.as_bytes())
            }
        },
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
