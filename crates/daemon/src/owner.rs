// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner process lifecycle: claim the cache directory, answer dump requests,
//! persist the final run on the way out.

use crate::persister::{dump_signal, listen_for_signal, DumpTrigger, PersistError, SnapshotPersister};
use crate::report::ReportBuilder;
use fs2::FileExt;
use lit_core::{pid_file, CacheLayout, PidFileError};
use std::fs::File;
use std::sync::Arc;
use thiserror::Error;
use tokio::signal::unix::SignalKind;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum OwnerError {
    #[error("Failed to acquire lock: another owner is running?")]
    LockFailed(#[source] std::io::Error),

    #[error("PID file error: {0}")]
    PidFile(#[from] PidFileError),

    #[error("Failed to install dump signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A running owner of one cache directory.
pub struct Owner {
    layout: CacheLayout,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    lock_file: File,
    persister: Arc<SnapshotPersister>,
    trigger: DumpTrigger,
    shutdown: CancellationToken,
    worker: JoinHandle<()>,
    signals: JoinHandle<()>,
}

impl Owner {
    /// Take ownership of `layout`'s cache directory and start answering dump
    /// requests with snapshots from `builder`.
    pub async fn start(
        layout: CacheLayout,
        builder: Arc<dyn ReportBuilder>,
    ) -> Result<Self, OwnerError> {
        Self::start_on_signal(layout, builder, dump_signal()).await
    }

    pub(crate) async fn start_on_signal(
        layout: CacheLayout,
        builder: Arc<dyn ReportBuilder>,
        kind: SignalKind,
    ) -> Result<Self, OwnerError> {
        std::fs::create_dir_all(&layout.cache_dir)?;

        // Don't truncate before holding the lock; that would wipe a running
        // owner's PID.
        let lock_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&layout.pid_path)?;
        lock_file.try_lock_exclusive().map_err(OwnerError::LockFailed)?;

        // The listener must be in place before the PID is published: until
        // then the dump signal still has its default action and would kill us.
        let persister = Arc::new(SnapshotPersister::new(&layout, builder));
        let shutdown = CancellationToken::new();
        let (trigger, worker) = Arc::clone(&persister).spawn(shutdown.clone());
        let signals = match listen_for_signal(kind, trigger.clone()) {
            Ok(signals) => signals,
            Err(e) => {
                shutdown.cancel();
                worker.abort();
                remove_file_logged(&layout.pid_path, "PID");
                return Err(OwnerError::Signal(e));
            }
        };

        let mut lock_file = lock_file;
        if let Err(e) = pid_file::write(&mut lock_file, std::process::id()) {
            signals.abort();
            shutdown.cancel();
            worker.abort();
            remove_file_logged(&layout.pid_path, "PID");
            return Err(e.into());
        }

        info!(pid = std::process::id(), cache_dir = %layout.cache_dir.display(), "owner started");
        Ok(Self { layout, lock_file, persister, trigger, shutdown, worker, signals })
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Handle for requesting dumps without a signal. Requests made after
    /// [`Owner::finalize`] report the owner as gone.
    pub fn trigger(&self) -> DumpTrigger {
        self.trigger.clone()
    }

    /// Stop answering dump requests, write the persisted run and release the
    /// cache directory.
    ///
    /// A dump already in flight completes before the persisted run is written.
    pub async fn finalize(self) -> Result<(), OwnerError> {
        let Owner { layout, lock_file, persister, trigger, shutdown, worker, signals } = self;

        signals.abort();
        let _ = signals.await;
        // Outstanding trigger clones must not keep the worker alive.
        shutdown.cancel();
        drop(trigger);
        if let Err(e) = worker.await {
            warn!(error = %e, "snapshot worker did not shut down cleanly");
        }

        let run_path = layout.run_path.clone();
        let written = tokio::task::spawn_blocking(move || persister.persist_to(&run_path))
            .await
            .map_err(std::io::Error::other)?;

        remove_file_logged(&layout.pid_path, "PID");
        drop(lock_file);

        written?;
        info!(path = %layout.run_path.display(), "persisted final run");
        Ok(())
    }
}

fn remove_file_logged(path: &std::path::Path, what: &str) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to remove {} file: {}", what, e);
        }
    }
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
