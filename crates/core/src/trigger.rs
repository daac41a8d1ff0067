// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-project trigger graph edges.

use crate::ids::ProjectId;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// A directed edge `(source, target, stage)` driving a cross-project
/// rebuild (spec.md §3, §4.7). `stage` must satisfy
/// [`Stage::is_trigger_target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub source: ProjectId,
    pub target: ProjectId,
    pub stage: Stage,
}

/// Which back-reference field on the target project an edge installs.
///
/// `Prepare` edges set `prepareDep`, `Package` edges set `packageDep`; every
/// other trigger stage carries no back-reference (spec.md §3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backref {
    PrepareDep,
    PackageDep,
}

impl Trigger {
    pub fn backref(&self) -> Option<Backref> {
        match self.stage {
            Stage::Prepare => Some(Backref::PrepareDep),
            Stage::Package => Some(Backref::PackageDep),
            _ => None,
        }
    }
}

/// Compute the `(target, backref, source)` updates a full trigger replace
/// must apply, alongside the `(target, backref)` clears for edges that no
/// longer exist.
///
/// Updating triggers is a full replace (spec.md §4.7): all prior edges from
/// `source` are dropped and any back-references they installed on their
/// targets are cleared, then the new edges are installed and their
/// back-references attached. This function is the pure computation at the
/// center of that replace; the caller (engine) is responsible for the
/// store writes.
pub fn diff_backrefs(
    source: ProjectId,
    old_edges: &[Trigger],
    new_edges: &[Trigger],
) -> (Vec<(ProjectId, Backref)>, Vec<(ProjectId, Backref, ProjectId)>) {
    let clears: Vec<(ProjectId, Backref)> = old_edges
        .iter()
        .filter_map(|e| e.backref().map(|b| (e.target, b)))
        .collect();
    let installs: Vec<(ProjectId, Backref, ProjectId)> = new_edges
        .iter()
        .filter_map(|e| e.backref().map(|b| (e.target, b, source)))
        .collect();
    (clears, installs)
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
