// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project: the in-memory runtime record for one registered build.

use crate::ids::ProjectId;
use crate::stage::State;
use crate::task::Task;
use crate::trigger::Trigger;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A project's `tasks` list retains at most this many recent tasks in
/// memory; older ones remain in the store but are evicted here (spec.md §3).
pub const MAX_RECENT_TASKS: usize = 5;

/// Configuration for creating a new project.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub name: String,
    pub labels: String,
    pub url: String,
    pub branch: String,
    pub destination: String,
    pub tag: String,
    pub build_spec: String,
    pub package_spec: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            labels: String::new(),
            url: String::new(),
            branch: "main".to_string(),
            destination: String::new(),
            tag: "$VERSION".to_string(),
            build_spec: "BuildSpec".to_string(),
            package_spec: "PackageSpec".to_string(),
        }
    }
}

/// A registered project and its runtime state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub labels: String,
    pub url: String,
    pub branch: String,
    pub destination: String,
    pub tag: String,
    pub build_spec: String,
    pub package_spec: String,
    /// SHA-256 of the build-spec file as of the last PULL_SUCCESS (spec.md §4.1).
    #[serde(default)]
    pub build_hash: Vec<u8>,
    pub state: State,
    pub version: u64,
    #[serde(skip)]
    pub tasks: VecDeque<Task>,
    #[serde(skip)]
    pub triggers: Vec<Trigger>,
    pub prepare_dep: Option<ProjectId>,
    pub package_dep: Option<ProjectId>,
}

impl Project {
    pub fn new(id: ProjectId, config: ProjectConfig) -> Self {
        Self {
            id,
            name: config.name,
            labels: config.labels,
            url: config.url,
            branch: config.branch,
            destination: config.destination,
            tag: config.tag,
            build_spec: config.build_spec,
            package_spec: config.package_spec,
            build_hash: Vec::new(),
            // A freshly created project starts in CREATE_SUCCESS so the
            // first cascade step is CLEANING (spec.md §4.1).
            state: State::success(crate::stage::Stage::Create),
            version: 0,
            tasks: VecDeque::new(),
            triggers: Vec::new(),
            prepare_dep: None,
            package_dep: None,
        }
    }

    /// Append a task, evicting the oldest beyond [`MAX_RECENT_TASKS`].
    pub fn push_task(&mut self, task: Task) {
        self.tasks.push_back(task);
        while self.tasks.len() > MAX_RECENT_TASKS {
            self.tasks.pop_front();
        }
    }

    pub fn rendered_tag(&self) -> String {
        crate::tag::render_tag(&self.tag, self.version)
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
