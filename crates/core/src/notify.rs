// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dump requests delivered to the owner process.
//!
//! Production requests are a Unix signal sent to the owner's pid. In-process
//! implementations let the polling protocol be exercised without a second
//! process.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use thiserror::Error;

/// When the owner receives this signal it writes the dumped snapshot.
pub const DUMP_SIGNAL: Signal = Signal::SIGUSR1;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// No process with that id exists; the owner has exited.
    #[error("pid {0} does not match a running process")]
    ProcessNotFound(u32),

    #[error("failed to deliver dump request to pid {pid}: {source}")]
    Delivery {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Asks the owner process to write a fresh snapshot.
pub trait DumpNotifier {
    fn request_dump(&self, pid: u32) -> Result<(), NotifyError>;
}

/// Sends [`DUMP_SIGNAL`] to the owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalNotifier;

impl DumpNotifier for SignalNotifier {
    fn request_dump(&self, pid: u32) -> Result<(), NotifyError> {
        let Ok(raw) = i32::try_from(pid) else {
            return Err(NotifyError::ProcessNotFound(pid));
        };
        match kill(Pid::from_raw(raw), DUMP_SIGNAL) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => Err(NotifyError::ProcessNotFound(pid)),
            Err(errno) => Err(NotifyError::Delivery { pid, source: errno.into() }),
        }
    }
}

impl<N: DumpNotifier + ?Sized> DumpNotifier for &N {
    fn request_dump(&self, pid: u32) -> Result<(), NotifyError> {
        (**self).request_dump(pid)
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
