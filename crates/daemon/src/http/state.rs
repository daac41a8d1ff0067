// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared axum state.

use racs_engine::Engine;
use std::sync::Arc;

/// State threaded through every handler. `no_login` mirrors the daemon's
/// `--no-login` flag (spec.md §6): when set, authentication is skipped and
/// every request acts as admin. Session cookies, PAM, and the login form
/// itself are external collaborators per spec.md §1 and are not modeled here.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub no_login: bool,
}
