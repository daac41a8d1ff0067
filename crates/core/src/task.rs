// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task: the execution record for one pipeline action.

use crate::ids::{ProjectId, TaskId};
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task. Transitions exactly once, from `Running` to
/// either `Success` or `Error` (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Running,
    Success,
    Error,
}

impl TaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Running => "RUNNING",
            TaskState::Success => "SUCCESS",
            TaskState::Error => "ERROR",
        }
    }

    pub fn from_str(s: &str) -> Option<TaskState> {
        match s {
            "RUNNING" => Some(TaskState::Running),
            "SUCCESS" => Some(TaskState::Success),
            "ERROR" => Some(TaskState::Error),
            _ => None,
        }
    }

    pub fn from_success(success: bool) -> TaskState {
        if success {
            TaskState::Success
        } else {
            TaskState::Error
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One execution record of a pipeline action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project: ProjectId,
    /// String form of the stage whose action produced this task, e.g. `"CLONING"`.
    pub kind: String,
    pub state: TaskState,
    pub created_at_ms: i64,
}

impl Task {
    /// The task `kind` string for a stage, e.g. `Stage::Clone` -> `"CLONING"`
    /// (spec.md §3: "kind (string form of the state whose action produced
    /// it, e.g. `CLONING`)").
    pub fn kind_for_stage(stage: Stage) -> &'static str {
        match stage {
            Stage::Create => "CREATING",
            Stage::Clean => "CLEANING",
            Stage::Clone => "CLONING",
            Stage::Prepare => "PREPARING",
            Stage::Pull => "PULLING",
            Stage::Build => "BUILDING",
            Stage::Package => "PACKAGING",
            Stage::Push => "PUSHING",
            Stage::Delete => "DELETING",
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
