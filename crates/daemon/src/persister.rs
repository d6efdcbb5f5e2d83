// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner-side snapshot persistence.
//!
//! Dump requests (from the signal listener or an in-process [`DumpTrigger`])
//! only enqueue work. A single worker task builds, serializes and writes the
//! snapshot, so no file I/O happens in signal context.

use crate::report::{ReportBuilder, ReportError};
use lit_core::{atomic_write, CacheLayout, DumpNotifier, NotifyError, DUMP_SIGNAL};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not build run: {0}")]
    Report(#[from] ReportError),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the current run to the dumped-snapshot path.
pub struct SnapshotPersister {
    builder: Arc<dyn ReportBuilder>,
    dumped_run_path: PathBuf,
}

impl SnapshotPersister {
    pub fn new(layout: &CacheLayout, builder: Arc<dyn ReportBuilder>) -> Self {
        Self { builder, dumped_run_path: layout.dumped_run_path.clone() }
    }

    /// Build and write one snapshot synchronously.
    pub fn persist_now(&self) -> Result<(), PersistError> {
        self.persist_to(&self.dumped_run_path)
    }

    /// Build the current run and atomically write it to `path`.
    pub fn persist_to(&self, path: &Path) -> Result<(), PersistError> {
        let run = self.builder.current_run()?;
        let json = run.to_pretty_json()?;
        atomic_write(path, json.as_bytes())?;
        Ok(())
    }

    /// Start the worker task. Must be called from within a tokio runtime.
    ///
    /// The worker exits when `shutdown` is cancelled or every [`DumpTrigger`]
    /// has been dropped. A dump in progress is finished first.
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> (DumpTrigger, JoinHandle<()>) {
        // Capacity one: a request arriving while a dump is being written is
        // kept, any further ones are absorbed by it.
        let (tx, mut rx) = mpsc::channel::<()>(1);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    request = rx.recv() => {
                        if request.is_none() {
                            break;
                        }
                    }
                }
                let persister = Arc::clone(&self);
                match tokio::task::spawn_blocking(move || persister.persist_now()).await {
                    Ok(Ok(())) => {
                        debug!(path = %self.dumped_run_path.display(), "dumped run snapshot")
                    }
                    Ok(Err(e)) => warn!(error = %e, "failed to dump run snapshot"),
                    Err(e) => error!(error = %e, "snapshot worker panicked"),
                }
            }
            debug!("snapshot worker stopped");
        });
        (DumpTrigger { tx }, handle)
    }
}

/// Enqueues dump requests for the persister worker.
#[derive(Clone)]
pub struct DumpTrigger {
    tx: mpsc::Sender<()>,
}

impl DumpTrigger {
    /// Request a dump. Returns `false` once the worker has stopped.
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        }
    }
}

/// In-process stand-in for signalling the owner; `pid` is ignored.
impl DumpNotifier for DumpTrigger {
    fn request_dump(&self, pid: u32) -> Result<(), NotifyError> {
        if self.request() {
            Ok(())
        } else {
            Err(NotifyError::ProcessNotFound(pid))
        }
    }
}

/// The signal requesters send, as a tokio [`SignalKind`].
pub fn dump_signal() -> SignalKind {
    SignalKind::from_raw(DUMP_SIGNAL as i32)
}

/// Forward every `kind` signal delivered to this process to `trigger`.
///
/// Installing the listener replaces the signal's default action for the rest
/// of the process lifetime.
pub fn listen_for_signal(kind: SignalKind, trigger: DumpTrigger) -> std::io::Result<JoinHandle<()>> {
    let mut dump_signal = signal(kind)?;
    Ok(tokio::spawn(async move {
        while dump_signal.recv().await.is_some() {
            debug!("received dump signal");
            if !trigger.request() {
                break;
            }
        }
    }))
}

#[cfg(test)]
#[path = "persister_tests.rs"]
mod tests;
