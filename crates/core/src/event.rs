// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire event records broadcast to subscribers (spec.md §4.5).
//!
//! Serializes with `{"event": "project/create", ...}` format, matching the
//! JSON shapes spec.md §4.5 lists verbatim.

use crate::ids::{ProjectId, TaskId};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a project, used both in `project/create` and
/// as an entry of the `project/list` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub id: ProjectId,
    pub name: String,
    pub labels: String,
    pub url: String,
    pub branch: String,
    pub destination: String,
    pub tag: String,
    #[serde(rename = "buildSpec")]
    pub build_spec: String,
    #[serde(rename = "packageSpec")]
    pub package_spec: String,
    pub state: String,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    #[serde(rename = "project/create")]
    ProjectCreate {
        #[serde(flatten)]
        project: ProjectSnapshot,
    },

    #[serde(rename = "project/update")]
    ProjectUpdate {
        id: ProjectId,
        /// Only the fields that were edited by the request.
        #[serde(flatten)]
        edited: serde_json::Map<String, serde_json::Value>,
    },

    #[serde(rename = "project/state")]
    ProjectState { id: ProjectId, state: String },

    #[serde(rename = "project/version")]
    ProjectVersion { id: ProjectId, version: u64 },

    #[serde(rename = "task/create")]
    TaskCreate {
        project: ProjectId,
        id: TaskId,
        #[serde(rename = "type")]
        kind: String,
        time: i64,
        state: String,
    },

    #[serde(rename = "task/state")]
    TaskState {
        project: ProjectId,
        id: TaskId,
        state: String,
    },

    #[serde(rename = "project/list")]
    ProjectList { projects: Vec<ProjectSnapshot> },
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
