// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine facade: the surface HTTP handlers (or the reconciler) call
//! into. Owns the project and queue registries and serializes metadata
//! writes against the owning worker via each project's mutex (spec.md §5,
//! §9 "route such writes through the worker's queue or a per-project
//! mutex").

use crate::error::EngineError;
use crate::event_bus::EventBus;
use crate::executor::ProcessRunner;
use crate::shared::EngineShared;
use crate::worker::{self, ActionRequest};
use parking_lot::Mutex;
use racs_core::{diff_backrefs, Backref, Clock, Event, Project, ProjectConfig, ProjectId, ProjectSnapshot, Registry, Stage, Trigger};
use racs_storage::{ProjectEdit, Store};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

pub struct Engine {
    shared: Arc<EngineShared>,
}

impl Engine {
    pub fn new(
        store: Arc<Store>,
        runner: Arc<dyn ProcessRunner>,
        clock: Arc<dyn Clock>,
        projects_root: PathBuf,
        tasks_root: PathBuf,
    ) -> Self {
        Self {
            shared: Arc::new(EngineShared::new(store, EventBus::new(), runner, clock, projects_root, tasks_root)),
        }
    }

    pub fn shared(&self) -> &Arc<EngineShared> {
        &self.shared
    }

    /// Adopt an already-persisted project (used by the reconciler at
    /// startup) and spawn its worker, without kicking off the pipeline.
    pub fn adopt(&self, project: Project) {
        let id = project.id;
        let handle = Arc::new(Mutex::new(project));
        let (tx, _join) = worker::spawn(handle.clone(), self.shared.clone());
        self.shared.queues.write().insert(id, tx);
        self.shared.projects.write().insert(id, handle);
    }

    /// Create a new project (`POST /project/create`, spec.md §6): persist
    /// it, spawn its worker, emit `project/create`, and kick off the
    /// pipeline from its initial CREATE_SUCCESS state.
    pub async fn create_project(&self, config: ProjectConfig) -> Result<ProjectId, EngineError> {
        let id = self.shared.store.insert_project(&config)?;
        info!(project = %id, name = %config.name, "created project");
        let project = Project::new(id, config);
        let event_snapshot = worker::snapshot(&project);
        let handle = Arc::new(Mutex::new(project));

        let (tx, _join) = worker::spawn(handle.clone(), self.shared.clone());
        self.shared.queues.write().insert(id, tx.clone());
        self.shared.projects.write().insert(id, handle);

        self.shared.bus.publish(Event::ProjectCreate { project: event_snapshot });
        tx.send(ActionRequest { stage: Stage::Clean, trigger: String::new() })
            .await
            .map_err(|_| EngineError::QueueClosed(id))?;
        Ok(id)
    }

    /// `POST /project/update`: mutate metadata, persist, emit `project/update`.
    pub fn update_project(&self, id: ProjectId, edit: ProjectEdit) -> Result<(), EngineError> {
        let handle = self.project_handle(id)?;
        self.shared.store.update_project_metadata(id, &edit)?;

        let mut edited = serde_json::Map::new();
        {
            let mut guard = handle.lock();
            macro_rules! apply {
                ($field:ident, $json_key:literal) => {
                    if let Some(value) = edit.$field.clone() {
                        edited.insert($json_key.to_string(), serde_json::Value::String(value.clone()));
                        guard.$field = value;
                    }
                };
            }
            apply!(name, "name");
            apply!(labels, "labels");
            apply!(url, "url");
            apply!(branch, "branch");
            apply!(destination, "destination");
            apply!(tag, "tag");
            apply!(build_spec, "buildSpec");
            apply!(package_spec, "packageSpec");
        }

        self.shared.bus.publish(Event::ProjectUpdate { id, edited });
        Ok(())
    }

    /// `POST /project/triggers`: full replace of outgoing edges (spec.md
    /// §4.7). Installs/clears `prepareDep`/`packageDep` on affected targets
    /// in both Store and in-memory state.
    pub fn replace_triggers(&self, source: ProjectId, new_edges: Vec<Trigger>) -> Result<(), EngineError> {
        let handle = self.project_handle(source)?;
        let old_edges = handle.lock().triggers.clone();

        self.shared.store.replace_triggers(source, &new_edges)?;
        let (clears, installs) = diff_backrefs(source, &old_edges, &new_edges);

        let projects = self.shared.projects.read();
        for (target, backref) in clears {
            if let Some(target_handle) = projects.get(&target) {
                set_backref(&mut target_handle.lock(), backref, None);
            }
        }
        for (target, backref, src) in installs {
            if let Some(target_handle) = projects.get(&target) {
                set_backref(&mut target_handle.lock(), backref, Some(src));
            }
        }
        drop(projects);

        handle.lock().triggers = new_edges;
        Ok(())
    }

    /// `POST /project/build?stage=...`: enqueue an explicit action
    /// (spec.md §6). `trigger` is empty unless this is a re-triggered
    /// downstream action.
    pub async fn enqueue_build(&self, id: ProjectId, stage: Stage, trigger: String) -> Result<(), EngineError> {
        self.project_handle(id)?;
        self.shared.enqueue(id, stage, trigger).await
    }

    /// `POST /project/delete?confirm=YES`: enqueue DELETING.
    pub async fn delete_project(&self, id: ProjectId) -> Result<(), EngineError> {
        self.project_handle(id)?;
        self.shared.enqueue(id, Stage::Delete, String::new()).await
    }

    /// `GET /project/list`, `/project/status`: read-only snapshots.
    pub fn list_projects(&self) -> Vec<ProjectSnapshot> {
        self.shared
            .projects
            .read()
            .values()
            .map(|handle| worker::snapshot(&handle.lock()))
            .collect()
    }

    pub fn project_snapshot(&self, id: ProjectId) -> Option<ProjectSnapshot> {
        self.shared.projects.read().get(&id).map(|handle| worker::snapshot(&handle.lock()))
    }

    /// `GET /project/events`: subscribe, returning the `project/list`
    /// snapshot this subscriber should emit as its own first message
    /// (spec.md §4.5) alongside the receiver for every event published
    /// from this point on.
    pub fn subscribe(&self) -> (Event, broadcast::Receiver<Event>) {
        self.shared.bus.subscribe_with_snapshot(|| Event::ProjectList { projects: self.list_projects() })
    }

    pub fn upsert_registry(&self, registry: Registry) -> Result<(), EngineError> {
        self.shared.store.upsert_registry(&registry)?;
        self.shared.registries.write().insert(registry.name.clone(), registry);
        Ok(())
    }

    fn project_handle(&self, id: ProjectId) -> Result<Arc<Mutex<Project>>, EngineError> {
        self.shared.projects.read().get(&id).cloned().ok_or(EngineError::UnknownProject(id))
    }
}

fn set_backref(project: &mut Project, backref: Backref, source: Option<ProjectId>) {
    match backref {
        Backref::PrepareDep => project.prepare_dep = source,
        Backref::PackageDep => project.package_dep = source,
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
