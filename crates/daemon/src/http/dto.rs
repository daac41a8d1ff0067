// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire DTOs for the HTTP control surface (spec.md §6). These are kept
//! separate from `racs-core`'s runtime types so the JSON shape the browser
//! sends is free to evolve independently of the in-memory model.

use racs_core::{ProjectId, Stage};
use racs_storage::ProjectEdit;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub labels: String,
    pub url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub destination: String,
    pub tag: String,
    #[serde(rename = "buildSpec", default = "default_build_spec")]
    pub build_spec: String,
    #[serde(rename = "packageSpec", default = "default_package_spec")]
    pub package_spec: String,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_build_spec() -> String {
    "BuildSpec".to_string()
}

fn default_package_spec() -> String {
    "PackageSpec".to_string()
}

impl From<CreateProjectRequest> for racs_core::ProjectConfig {
    fn from(req: CreateProjectRequest) -> Self {
        racs_core::ProjectConfig {
            name: req.name,
            labels: req.labels,
            url: req.url,
            branch: req.branch,
            destination: req.destination,
            tag: req.tag,
            build_spec: req.build_spec,
            package_spec: req.package_spec,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectRequest {
    pub id: i64,
    pub name: Option<String>,
    pub labels: Option<String>,
    pub url: Option<String>,
    pub branch: Option<String>,
    pub destination: Option<String>,
    pub tag: Option<String>,
    #[serde(rename = "buildSpec")]
    pub build_spec: Option<String>,
    #[serde(rename = "packageSpec")]
    pub package_spec: Option<String>,
}

impl UpdateProjectRequest {
    pub fn project_id(&self) -> ProjectId {
        ProjectId::new(self.id)
    }

    pub fn into_edit(self) -> ProjectEdit {
        ProjectEdit {
            name: self.name,
            labels: self.labels,
            url: self.url,
            branch: self.branch,
            destination: self.destination,
            tag: self.tag,
            build_spec: self.build_spec,
            package_spec: self.package_spec,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerEdge {
    pub target: i64,
    pub stage: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceTriggersRequest {
    pub id: i64,
    pub triggers: Vec<TriggerEdge>,
}

impl ReplaceTriggersRequest {
    pub fn source_id(&self) -> ProjectId {
        ProjectId::new(self.id)
    }

    pub fn into_triggers(self) -> Result<Vec<racs_core::Trigger>, String> {
        let source = self.source_id();
        self.triggers
            .into_iter()
            .map(|edge| {
                parse_stage(&edge.stage)
                    .filter(|s| s.is_trigger_target())
                    .map(|stage| racs_core::Trigger { source, target: ProjectId::new(edge.target), stage })
                    .ok_or_else(|| format!("unknown trigger stage {:?}", edge.stage))
            })
            .collect()
    }
}

/// Parses the lowercase stage names spec.md §6 enumerates for
/// `/project/build?stage=...` and trigger edges.
pub fn parse_stage(raw: &str) -> Option<Stage> {
    match raw {
        "clean" => Some(Stage::Clean),
        "clone" => Some(Stage::Clone),
        "prepare" => Some(Stage::Prepare),
        "pull" => Some(Stage::Pull),
        "build" => Some(Stage::Build),
        "package" => Some(Stage::Package),
        "push" => Some(Stage::Push),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildQuery {
    pub id: i64,
    pub stage: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectQuery {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteQuery {
    pub id: i64,
    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogQuery {
    pub id: i64,
    #[serde(default)]
    pub offset: u64,
}

#[cfg(test)]
#[path = "dto_tests.rs"]
mod tests;
