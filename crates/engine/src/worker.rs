// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-project worker: the single continuous loop that drains the
//! action queue, drives the state machine, calls the executor, persists,
//! and emits events (spec.md §4.2).

use crate::command_table::build_command;
use crate::executor;
use crate::hash_check;
use crate::shared::EngineShared;
use parking_lot::Mutex;
use racs_core::{Event, ProjectSnapshot, Stage, State, Task, TaskState};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Capacity of a project's action queue (spec.md §4.2: "bounded (capacity
/// ≥10)").
pub const QUEUE_CAPACITY: usize = 16;

/// One `(target_stage, trigger_label)` request on a project's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub stage: Stage,
    pub trigger: String,
}

pub fn snapshot(project: &racs_core::Project) -> ProjectSnapshot {
    ProjectSnapshot {
        id: project.id,
        name: project.name.clone(),
        labels: project.labels.clone(),
        url: project.url.clone(),
        branch: project.branch.clone(),
        destination: project.destination.clone(),
        tag: project.tag.clone(),
        build_spec: project.build_spec.clone(),
        package_spec: project.package_spec.clone(),
        state: project.state.as_db_string(),
        version: project.version,
    }
}

/// Spawn the worker loop for one project. Returns the queue's sending
/// handle (to be registered in [`EngineShared::queues`]) and the task
/// handle. The loop exits after a successful DELETING action, or when the
/// sending half is dropped.
pub fn spawn(
    project: Arc<Mutex<racs_core::Project>>,
    shared: Arc<EngineShared>,
) -> (mpsc::Sender<ActionRequest>, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let handle = tokio::spawn(run(project, shared, rx));
    (tx, handle)
}

async fn run(
    project: Arc<Mutex<racs_core::Project>>,
    shared: Arc<EngineShared>,
    mut rx: mpsc::Receiver<ActionRequest>,
) {
    while let Some(request) = rx.recv().await {
        let id = project.lock().id;
        if let Some(next) = handle_request(&project, &shared, request).await {
            if let Err(err) = shared.enqueue(id, next.stage, next.trigger).await {
                warn!(project = %id, error = %err, "failed to enqueue cascade step");
            }
        } else {
            // DELETE_SUCCESS: nothing left to cascade to, terminate.
            let is_deleted = { project.lock().state == State::success(Stage::Delete) };
            if is_deleted {
                info!(project = %id, "worker terminating after delete");
                break;
            }
        }
    }
}

/// Run one request to completion; returns the next request to cascade to,
/// if any.
async fn handle_request(
    project: &Arc<Mutex<racs_core::Project>>,
    shared: &Arc<EngineShared>,
    request: ActionRequest,
) -> Option<ActionRequest> {
    let id = project.lock().id;
    let stage = request.stage;

    let command = {
        let guard = project.lock();
        let registry = shared.registry_for(&guard.destination);
        build_command(stage, &guard, &shared.projects_root, &request.trigger, registry.as_ref())
    };

    if stage == Stage::Push {
        let destination = project.lock().destination.clone();
        let login_log = shared.tasks_root.join("registry-login.log");
        crate::registry_login::ensure_logged_in(shared, &destination, &login_log).await;
    }

    set_state(project, shared, State::running(stage));

    let success = {
        let task_id = {
            let mut guard = project.lock();
            match shared.store.insert_task(id, Task::kind_for_stage(stage), shared.clock.epoch_ms()) {
                Ok(task_id) => {
                    let task = Task {
                        id: task_id,
                        project: id,
                        kind: Task::kind_for_stage(stage).to_string(),
                        state: TaskState::Running,
                        created_at_ms: shared.clock.epoch_ms(),
                    };
                    guard.push_task(task);
                    Some(task_id)
                }
                Err(err) => {
                    // (c) Store error on task insert is fatal: the worker
                    // cannot proceed without an id (spec.md §7c).
                    warn!(project = %id, error = %err, "failed to insert task row, aborting action");
                    None
                }
            }
        };
        let Some(task_id) = task_id else {
            return None;
        };

        shared.bus.publish(Event::TaskCreate {
            project: id,
            id: task_id,
            kind: Task::kind_for_stage(stage).to_string(),
            time: shared.clock.epoch_ms(),
            state: TaskState::Running.as_str().to_string(),
        });

        let log_path = shared.task_log_path(task_id.get());
        let outcome = executor::execute(shared.runner.as_ref(), &command, &log_path).await;
        let success = match outcome {
            Ok(success) => success,
            Err(err) => {
                warn!(project = %id, stage = %stage, error = %err, "failed to spawn action command");
                false
            }
        };

        let task_state = TaskState::from_success(success);
        if let Err(err) = shared.store.update_task_state(task_id, task_state) {
            warn!(project = %id, error = %err, "failed to persist task state");
        }
        {
            let mut guard = project.lock();
            if let Some(task) = guard.tasks.iter_mut().find(|t| t.id == task_id) {
                task.state = task_state;
            }
        }
        shared.bus.publish(Event::TaskState {
            project: id,
            id: task_id,
            state: task_state.as_str().to_string(),
        });

        success
    };

    let final_state = {
        let mut guard = project.lock();
        guard.state = guard.state.advance(success);
        guard.state
    };
    persist_and_emit_state(project, shared, final_state);

    if !success {
        return None;
    }

    cascade(project, shared, stage).await
}

fn set_state(project: &Arc<Mutex<racs_core::Project>>, shared: &Arc<EngineShared>, state: State) {
    project.lock().state = state;
    persist_and_emit_state(project, shared, state);
}

fn persist_and_emit_state(project: &Arc<Mutex<racs_core::Project>>, shared: &Arc<EngineShared>, state: State) {
    let id = project.lock().id;
    if let Err(err) = shared.store.update_project_state(id, state) {
        // (d) Store error on update is logged, not surfaced (spec.md §7d).
        warn!(project = %id, error = %err, "failed to persist project state");
    }
    shared.bus.publish(Event::ProjectState {
        id,
        state: state.as_db_string(),
    });
}

/// Apply the cascade rule for a just-concluded successful stage
/// (spec.md §4.1).
async fn cascade(
    project: &Arc<Mutex<racs_core::Project>>,
    shared: &Arc<EngineShared>,
    stage: Stage,
) -> Option<ActionRequest> {
    match stage {
        Stage::Create => Some(ActionRequest { stage: Stage::Clean, trigger: String::new() }),
        Stage::Clean => Some(ActionRequest { stage: Stage::Clone, trigger: String::new() }),
        Stage::Clone => Some(ActionRequest { stage: Stage::Prepare, trigger: String::new() }),
        Stage::Prepare => {
            // The builder image was just produced from the current
            // build-spec content; record it so PULL's post-hook only fires
            // a re-prepare when a later pull actually changes the recipe.
            seed_build_hash(project, shared);
            Some(ActionRequest { stage: Stage::Pull, trigger: String::new() })
        }
        Stage::Pull => Some(pull_post_hook(project, shared)),
        Stage::Build => Some(ActionRequest { stage: Stage::Package, trigger: String::new() }),
        Stage::Package => {
            let id = {
                let mut guard = project.lock();
                guard.version += 1;
                guard.id
            };
            let version = project.lock().version;
            if let Err(err) = shared.store.update_project_version(id, version) {
                warn!(project = %id, error = %err, "failed to persist version");
            }
            shared.bus.publish(Event::ProjectVersion { id, version });
            Some(ActionRequest { stage: Stage::Push, trigger: String::new() })
        }
        Stage::Push => {
            fire_triggers(project, shared).await;
            None
        }
        Stage::Delete => {
            let id = project.lock().id;
            if let Err(err) = shared.store.delete_project(id) {
                warn!(project = %id, error = %err, "failed to delete project row");
            }
            shared.queues.write().remove(&id);
            shared.projects.write().remove(&id);
            None
        }
    }
}

fn seed_build_hash(project: &Arc<Mutex<racs_core::Project>>, shared: &Arc<EngineShared>) {
    let (id, path) = {
        let guard = project.lock();
        (guard.id, shared.projects_root.join(guard.id.get().to_string()).join(&guard.build_spec))
    };
    match hash_check::hash_file(&path) {
        Ok(hash) => {
            project.lock().build_hash = hash.clone();
            if let Err(err) = shared.store.update_project_build_hash(id, &hash) {
                warn!(project = %id, error = %err, "failed to persist build hash");
            }
        }
        Err(err) => {
            warn!(project = %id, error = %err, "failed to hash build spec after prepare");
        }
    }
}

/// After PULL_SUCCESS, rebuild the builder image only if the build-spec
/// file's content changed since the last PULL (spec.md §4.1 PULL post-hook).
fn pull_post_hook(project: &Arc<Mutex<racs_core::Project>>, shared: &Arc<EngineShared>) -> ActionRequest {
    let (id, path, old_hash) = {
        let guard = project.lock();
        (
            guard.id,
            shared.projects_root.join(guard.id.get().to_string()).join(&guard.build_spec),
            guard.build_hash.clone(),
        )
    };

    match hash_check::hash_file(&path) {
        Ok(new_hash) if new_hash != old_hash => {
            {
                let mut guard = project.lock();
                guard.build_hash = new_hash.clone();
            }
            if let Err(err) = shared.store.update_project_build_hash(id, &new_hash) {
                warn!(project = %id, error = %err, "failed to persist build hash");
            }
            ActionRequest { stage: Stage::Prepare, trigger: String::new() }
        }
        Ok(_) => ActionRequest { stage: Stage::Build, trigger: String::new() },
        Err(err) => {
            warn!(project = %id, error = %err, "failed to hash build spec, rebuilding to be safe");
            ActionRequest { stage: Stage::Prepare, trigger: String::new() }
        }
    }
}

/// On PUSH_SUCCESS, enqueue every outgoing trigger on its target with this
/// project's rendered tag as the label (spec.md §4.7).
async fn fire_triggers(project: &Arc<Mutex<racs_core::Project>>, shared: &Arc<EngineShared>) {
    let (id, triggers, rendered_tag) = {
        let guard = project.lock();
        (guard.id, guard.triggers.clone(), guard.rendered_tag())
    };
    for trigger in triggers {
        if let Err(err) = shared.enqueue(trigger.target, trigger.stage, rendered_tag.clone()).await {
            warn!(
                source = %id,
                target = %trigger.target,
                error = %err,
                "failed to fire trigger"
            );
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
