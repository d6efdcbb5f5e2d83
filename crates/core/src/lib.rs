// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lit-core: run documents and the snapshot handshake shared by the owner
//! process and its requesters

pub mod atomic;
pub mod backoff;
pub mod consistency;
pub mod env;
pub mod layout;
pub mod notify;
pub mod pid_file;
pub mod run;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use atomic::atomic_write;
pub use backoff::{BackoffSleeper, Sleeper, ThreadSleeper};
#[cfg(any(test, feature = "test-support"))]
pub use backoff::FakeSleeper;
pub use consistency::{check, output_owners, ConsistencyError, OutputOwner, RunGate};
pub use env::EnvError;
pub use layout::CacheLayout;
pub use notify::{DumpNotifier, NotifyError, SignalNotifier, DUMP_SIGNAL};
pub use pid_file::PidFileError;
pub use run::{Job, MalformedRun, Run, SnapshotError};
