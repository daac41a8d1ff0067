// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: CLI flags (spec.md §6) plus the on-disk layout
//! roots the reconciler needs.

use clap::Parser;
use racs_engine::Roots;
use std::path::PathBuf;

/// `racsd` — the build-pipeline daemon.
#[derive(Debug, Clone, Parser)]
#[command(name = "racsd", version, about = "Multi-project continuous-build service")]
pub struct Config {
    /// TCP port to listen on (historically 8081).
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// TLS certificate path; serves plain HTTP when omitted.
    #[arg(long)]
    pub ssl_cert: Option<PathBuf>,

    /// TLS private key path, required alongside `--ssl-cert`.
    #[arg(long)]
    pub ssl_key: Option<PathBuf>,

    /// Disable authentication; every request is treated as admin.
    #[arg(long)]
    pub no_login: bool,

    /// Root directory holding `projects/`, `tasks/`, `uploads/`, and `main.db`.
    #[arg(long, default_value = "/var/lib/racs")]
    pub state_dir: PathBuf,
}

impl Config {
    /// Parse CLI args, honoring `RACS_STATE_DIR` as an override for anyone
    /// who hasn't passed `--state-dir` explicitly.
    pub fn parse_env() -> Self {
        let mut config = Config::parse();
        if config.state_dir == PathBuf::from("/var/lib/racs") {
            if let Some(dir) = std::env::var_os("RACS_STATE_DIR") {
                config.state_dir = PathBuf::from(dir);
            }
        }
        config
    }

    pub fn roots(&self) -> Roots {
        Roots {
            projects: self.state_dir.join("projects"),
            tasks: self.state_dir.join("tasks"),
            uploads: self.state_dir.join("uploads"),
            db_path: self.state_dir.join("main.db"),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("racsd.log")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
