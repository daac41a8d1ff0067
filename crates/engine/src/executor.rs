// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution for pipeline actions (spec.md §4.3).
//!
//! The real runner spawns the child with stdout and stderr both redirected
//! to the task's log file, preceded by a bold ANSI header line naming the
//! command. Tests substitute a [`ProcessRunner`] that never touches the
//! filesystem's process table.

use crate::command_table::CommandSpec;
use async_trait::async_trait;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Runs one command to completion and reports whether it exited zero.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec, log_file: File) -> std::io::Result<bool>;
}

/// Spawns real child processes via `tokio::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealRunner;

#[async_trait]
impl ProcessRunner for RealRunner {
    async fn run(&self, spec: &CommandSpec, log_file: File) -> std::io::Result<bool> {
        let out = log_file.try_clone()?;
        let err = log_file;
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd.stdout(Stdio::from(out));
        cmd.stderr(Stdio::from(err));
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        let status = cmd.spawn()?.wait().await?;
        Ok(status.success())
    }
}

/// Writes the task log header and runs the command, returning whether it
/// succeeded. `log_path` is created (or truncated) for this run.
pub async fn execute(
    runner: &dyn ProcessRunner,
    spec: &CommandSpec,
    log_path: &Path,
) -> std::io::Result<bool> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(log_path)?;
    writeln!(file, "\u{1b}[1m$ {}\u{1b}[0m", spec.command_line())?;
    file.flush()?;
    runner.run(spec, file).await
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
