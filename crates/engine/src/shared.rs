// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State shared by every project worker: the store handle, the event bus,
//! the executor's process runner, the clock, filesystem roots, and the
//! registry/queue lookup maps a worker needs to fire triggers and push.

use crate::event_bus::EventBus;
use crate::executor::ProcessRunner;
use crate::worker::ActionRequest;
use parking_lot::{Mutex, RwLock};
use racs_core::{Clock, Project, ProjectId, Registry};
use racs_storage::Store;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything a [`crate::worker::ProjectWorker`] needs beyond its own
/// project state. One instance is shared (via `Arc`) across every worker
/// and the HTTP-facing [`crate::engine::Engine`].
pub struct EngineShared {
    pub store: Arc<Store>,
    pub bus: EventBus,
    pub runner: Arc<dyn ProcessRunner>,
    pub clock: Arc<dyn Clock>,
    pub projects_root: PathBuf,
    pub tasks_root: PathBuf,
    pub registries: RwLock<HashMap<String, Registry>>,
    pub queues: RwLock<HashMap<ProjectId, mpsc::Sender<ActionRequest>>>,
    /// The in-memory project registry. Lives here, not on [`crate::engine::Engine`],
    /// so a worker can drop its own entry on DELETE_SUCCESS (spec.md §4.1).
    pub projects: RwLock<HashMap<ProjectId, Arc<Mutex<Project>>>>,
}

impl EngineShared {
    pub fn new(
        store: Arc<Store>,
        bus: EventBus,
        runner: Arc<dyn ProcessRunner>,
        clock: Arc<dyn Clock>,
        projects_root: PathBuf,
        tasks_root: PathBuf,
    ) -> Self {
        Self {
            store,
            bus,
            runner,
            clock,
            projects_root,
            tasks_root,
            registries: RwLock::new(HashMap::new()),
            queues: RwLock::new(HashMap::new()),
            projects: RwLock::new(HashMap::new()),
        }
    }

    pub fn task_log_path(&self, task_id: i64) -> PathBuf {
        self.tasks_root.join(task_id.to_string()).join("out.log")
    }

    pub fn registry_for(&self, destination: &str) -> Option<Registry> {
        if destination.is_empty() {
            return None;
        }
        self.registries.read().get(destination).cloned()
    }

    /// Best-effort enqueue onto another project's queue. Blocks (backpressure,
    /// spec.md §4.2) when that queue is full; fails only if the target
    /// project is unknown or its worker has already terminated.
    pub async fn enqueue(
        &self,
        target: ProjectId,
        stage: racs_core::Stage,
        trigger: String,
    ) -> Result<(), crate::error::EngineError> {
        let sender = {
            let queues = self.queues.read();
            queues
                .get(&target)
                .cloned()
                .ok_or(crate::error::EngineError::UnknownProject(target))?
        };
        sender
            .send(ActionRequest { stage, trigger })
            .await
            .map_err(|_| crate::error::EngineError::QueueClosed(target))
    }
}

#[cfg(test)]
#[path = "shared_tests.rs"]
mod tests;
