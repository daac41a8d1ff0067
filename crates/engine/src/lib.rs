// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! racs-engine: the executor, per-project worker, event bus, trigger
//! fan-out, registry login caching, image-prune loop, and startup
//! reconciler that together drive the build pipeline.

pub mod command_table;
pub mod engine;
pub mod error;
pub mod event_bus;
pub mod executor;
pub mod hash_check;
pub mod log_tail;
pub mod prune;
pub mod reconciler;
pub mod registry_login;
pub mod shared;
pub mod worker;

pub use command_table::{build_command, prune_command, CommandSpec};
pub use engine::Engine;
pub use error::EngineError;
pub use event_bus::EventBus;
pub use executor::{execute, ProcessRunner, RealRunner};
pub use log_tail::{read_tail, LogTail};
pub use reconciler::{reconcile, Roots};
pub use registry_login::ensure_logged_in;
pub use shared::EngineShared;
pub use worker::ActionRequest;
