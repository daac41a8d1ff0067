// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! racs-daemon: the `racsd` binary's library half — configuration, the
//! HTTP control surface, and the startup sequence that ties the engine
//! to a bound listener.

pub mod config;
pub mod http;

use racs_core::SystemClock;
use racs_engine::{reconcile, Engine, EngineError, RealRunner};
use std::sync::Arc;

/// Builds a fully reconciled [`Engine`] from `config`'s on-disk layout
/// (spec.md §4.8). Callers still need to spawn the prune loop and serve
/// the HTTP router themselves; this only covers startup recovery.
pub async fn build_engine(config: &config::Config) -> Result<Engine, EngineError> {
    let roots = config.roots();
    reconcile(&roots, Arc::new(RealRunner), Arc::new(SystemClock)).await
}
