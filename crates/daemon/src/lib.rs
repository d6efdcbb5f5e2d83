// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner side of the run snapshot handshake.
//!
//! The owner process holds the PID file, answers dump signals by writing
//! `dumped-run.json` into the cache directory, and writes `run.json` when it
//! finishes.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod owner;
pub mod persister;
pub mod report;

pub use owner::{Owner, OwnerError};
pub use persister::{dump_signal, listen_for_signal, DumpTrigger, PersistError, SnapshotPersister};
pub use report::{ReportBuilder, ReportError, RunFileSource, SharedRun};
