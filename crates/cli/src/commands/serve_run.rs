// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lit serve-run` - Own a run and answer dump requests until stopped
//!
//! A stand-in for the build process: it takes the owner role for the cache
//! directory and serves whatever the run file holds at the time of each
//! request. On SIGINT or SIGTERM it writes the persisted run and exits.

use anyhow::{Context, Result};
use clap::Args;
use lit_core::{CacheLayout, Run};
use lit_daemon::{Owner, RunFileSource};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal::unix::{signal, Signal, SignalKind};

#[derive(Args, Debug)]
pub struct ServeRunArgs {
    /// Run document to serve; re-read on every dump request
    #[arg(value_name = "RUN_FILE")]
    pub run_file: PathBuf,
}

pub fn serve_run(args: ServeRunArgs) -> Result<()> {
    let layout = CacheLayout::load()?;
    Run::load(&args.run_file)
        .with_context(|| format!("cannot serve {}", args.run_file.display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async move {
        // Registered before the PID is published so an early stop request is
        // not handled by the default action.
        let shutdown = ShutdownSignals::register()?;
        let owner = Owner::start(layout, Arc::new(RunFileSource::new(args.run_file))).await?;
        shutdown.recv().await;
        owner.finalize().await?;
        Ok::<(), anyhow::Error>(())
    })
}

struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
}

impl ShutdownSignals {
    fn register() -> std::io::Result<Self> {
        Ok(Self { sigterm: signal(SignalKind::terminate())?, sigint: signal(SignalKind::interrupt())? })
    }

    async fn recv(mut self) {
        tokio::select! {
            _ = self.sigterm.recv() => {}
            _ = self.sigint.recv() => {}
        }
        tracing::info!("shutting down");
    }
}
