// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic image-prune loop (spec.md §4.8 step 7). The prune policy itself
//! (`podman image prune -f --filter until=5m`) is out of scope per spec.md
//! §1 — this module only owns the scheduling the startup sequence asks for.

use crate::command_table::prune_command;
use crate::executor::ProcessRunner;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the prune command once, writing its output to `log_path`.
async fn run_once(runner: &dyn ProcessRunner, log_path: &std::path::Path) -> io::Result<bool> {
    crate::executor::execute(runner, &prune_command(), log_path).await
}

/// Drives the prune command on `interval` forever. Intended to be spawned
/// as its own task by the daemon at startup; a failed prune is logged and
/// the loop keeps going rather than exiting.
pub async fn run_loop(runner: Arc<dyn ProcessRunner>, log_path: PathBuf, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if let Err(err) = run_once(runner.as_ref(), &log_path).await {
            warn!(error = %err, "image prune failed to run");
        }
    }
}

#[cfg(test)]
#[path = "prune_tests.rs"]
mod tests;
