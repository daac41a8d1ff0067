// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup reconciliation (spec.md §4.8): ensure the on-disk layout exists,
//! open the store, and reinstantiate every project with its persisted
//! state, recent tasks, and trigger edges before any worker is told to do
//! anything.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::executor::ProcessRunner;
use racs_core::{Clock, MAX_RECENT_TASKS};
use racs_storage::Store;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// On-disk roots the reconciler ensures exist before opening the store.
#[derive(Debug, Clone)]
pub struct Roots {
    pub projects: PathBuf,
    pub tasks: PathBuf,
    pub uploads: PathBuf,
    pub db_path: PathBuf,
}

/// Run the startup sequence and return a fully populated [`Engine`], ready
/// to accept HTTP-driven requests. Workers are spawned for every persisted
/// project, but none are sent an initial action — a project found in a
/// `_RUNNING` state stays there until the user re-triggers it (spec.md
/// §4.8, §9).
pub async fn reconcile(
    roots: &Roots,
    runner: Arc<dyn ProcessRunner>,
    clock: Arc<dyn Clock>,
) -> Result<Engine, EngineError> {
    std::fs::create_dir_all(&roots.projects)?;
    std::fs::create_dir_all(&roots.tasks)?;
    std::fs::create_dir_all(&roots.uploads)?;

    let store = Arc::new(Store::open(&roots.db_path)?);
    let engine = Engine::new(store.clone(), runner, clock, roots.projects.clone(), roots.tasks.clone());

    for registry in store.list_registries()? {
        engine.shared().registries.write().insert(registry.name.clone(), registry);
    }

    let all_triggers = store.all_triggers()?;
    let projects = store.list_projects()?;
    info!(count = projects.len(), "reconciling persisted projects");
    for mut project in projects {
        let id = project.id;
        for task in store.recent_tasks(id, MAX_RECENT_TASKS)? {
            project.push_task(task);
        }
        project.triggers = all_triggers.iter().copied().filter(|t| t.source == id).collect();
        engine.adopt(project);
    }

    Ok(engine)
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
