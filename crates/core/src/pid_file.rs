// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner PID file.
//!
//! The owner holds an exclusive lock on the file while it runs (see
//! `lit-daemon`); readers never lock, they only parse the recorded id.

use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PidFileError {
    #[error("no PID file at {0}")]
    NotFound(String),
    #[error("PID file {path} does not hold a process id: {content:?}")]
    Invalid { path: String, content: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the owner's process id.
pub fn read(path: &Path) -> Result<u32, PidFileError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PidFileError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    // Zero and negative ids address process groups when signalled.
    content.trim().parse::<i32>().ok().filter(|pid| *pid > 0).map(|pid| pid as u32).ok_or_else(|| {
        PidFileError::Invalid { path: path.display().to_string(), content: content.clone() }
    })
}

/// Replace the contents of an open PID file with `pid`.
pub fn write(file: &mut std::fs::File, pid: u32) -> Result<(), PidFileError> {
    file.set_len(0)?;
    writeln!(file, "{pid}")?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "pid_file_tests.rs"]
mod tests;
