// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lit: inspect the run of a live build process

mod commands;
mod output;
mod requester;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::dump_run::{dump_run, DumpRunArgs};
use commands::serve_run::{serve_run, ServeRunArgs};
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser)]
#[command(name = "lit", version = VERSION, about = "Inspect the run of a live build process")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Signal the run owner to dump its run and print it
    DumpRun(DumpRunArgs),
    /// Own a run and answer dump requests until interrupted
    ServeRun(ServeRunArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::DumpRun(args) => dump_run(args),
        Command::ServeRun(args) => serve_run(args),
    }
}

/// Log to stderr; stdout carries only JSON.
fn init_tracing() {
    let filter = lit_core::env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
