// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry login caching (spec.md §3, §9): refreshed lazily when older
//! than 1 hour, called synchronously before PUSHING.

use crate::command_table::CommandSpec;
use crate::executor;
use crate::shared::EngineShared;
use std::path::Path;
use tracing::warn;

/// Runs `podman login` against `registry` if its cached login is stale or
/// absent, then records the refreshed timestamp. Login failures are logged
/// and swallowed — a failed `podman push` downstream will surface the real
/// problem, and a registry that needs no auth (`user` empty) never reaches
/// the login attempt at all.
pub async fn ensure_logged_in(shared: &EngineShared, registry_name: &str, login_log_path: &Path) {
    let Some(registry) = shared.registry_for(registry_name) else {
        return;
    };
    let now = shared.clock.epoch_ms();
    if !registry.needs_login(now) {
        return;
    }

    let spec = CommandSpec {
        program: "podman".to_string(),
        args: vec![
            "login".to_string(),
            "-u".to_string(),
            registry.user.clone(),
            "-p".to_string(),
            registry.password.clone(),
            registry.url.clone(),
        ],
        env: Vec::new(),
    };

    match executor::execute(shared.runner.as_ref(), &spec, login_log_path).await {
        Ok(true) => {
            if let Err(err) = shared.store.update_registry_login(registry_name, now) {
                warn!(registry = registry_name, error = %err, "failed to persist registry login timestamp");
            }
            shared
                .registries
                .write()
                .entry(registry_name.to_string())
                .and_modify(|r| r.last_login_ms = Some(now));
        }
        Ok(false) => warn!(registry = registry_name, "podman login exited non-zero"),
        Err(err) => warn!(registry = registry_name, error = %err, "failed to spawn podman login"),
    }
}

#[cfg(test)]
#[path = "registry_login_tests.rs"]
mod tests;
