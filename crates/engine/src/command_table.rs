// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage → external command table (spec.md §4.4). This is data, not control
//! flow: one pure function maps a stage and a project's fields to the
//! program and arguments the executor should run.

use racs_core::{Project, Registry, Stage};
use std::path::{Path, PathBuf};

/// A command ready to spawn: program, argument vector, and any extra
/// environment variables beyond the process-wide ones (spec.md §4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
            env: Vec::new(),
        }
    }

    /// The full command line, for the executor's bold ANSI header
    /// (spec.md §4.3).
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

fn project_dir(projects_root: &Path, id: i64) -> PathBuf {
    projects_root.join(id.to_string())
}

/// Build the command for `stage` against `project`. `trigger_label` is the
/// value forwarded to BUILD children as `RACS_TRIGGER` (empty string if the
/// action wasn't fired by a trigger). `registry` is the destination
/// registry, looked up by the caller from `project.destination`; `None`
/// when no such registry is configured (spec.md §4.4, §7f).
pub fn build_command(
    stage: Stage,
    project: &Project,
    projects_root: &Path,
    trigger_label: &str,
    registry: Option<&Registry>,
) -> CommandSpec {
    let dir = project_dir(projects_root, project.id.get());
    match stage {
        Stage::Create => CommandSpec::new("true", vec![]),
        Stage::Clean => CommandSpec::new(
            "rm",
            vec![
                "-rfv".to_string(),
                dir.join("workspace/source").display().to_string(),
            ],
        ),
        Stage::Clone => CommandSpec::new(
            "git",
            vec![
                "clone".to_string(),
                "-v".to_string(),
                "--recursive".to_string(),
                "-b".to_string(),
                project.branch.clone(),
                project.url.clone(),
                dir.join("workspace/source").display().to_string(),
            ],
        ),
        Stage::Prepare => {
            let mut args = vec![
                "build".to_string(),
                "--squash-all".to_string(),
                "-f".to_string(),
                dir.join(&project.build_spec).display().to_string(),
                "-t".to_string(),
                format!("builder-{}", project.id),
            ];
            if let Some(dep) = project.prepare_dep {
                args.push("--from".to_string());
                args.push(format!("project-{dep}"));
            }
            args.push(dir.join("context").display().to_string());
            CommandSpec::new("podman", args)
        }
        Stage::Pull => CommandSpec::new(
            "git",
            vec![
                "-C".to_string(),
                dir.join("workspace/source").display().to_string(),
                "pull".to_string(),
                "--recurse-submodules".to_string(),
            ],
        ),
        Stage::Build => {
            let args = vec![
                "run".to_string(),
                "--network=host".to_string(),
                "--rm=true".to_string(),
                "-e".to_string(),
                format!("RACS_TRIGGER={trigger_label}"),
                "-v".to_string(),
                format!("{}:/workspace", dir.join("workspace").display()),
                "--read-only".to_string(),
                format!("builder-{}", project.id),
            ];
            let mut spec = CommandSpec::new("podman", args);
            spec.env.push(("RACS_TRIGGER".to_string(), trigger_label.to_string()));
            spec
        }
        Stage::Package => {
            let mut args = vec![
                "build".to_string(),
                "-v".to_string(),
                format!("{}:/workspace", dir.join("workspace").display()),
                "--squash".to_string(),
                "-f".to_string(),
                dir.join(&project.package_spec).display().to_string(),
                "-t".to_string(),
                format!("project-{}", project.id),
            ];
            if let Some(dep) = project.package_dep {
                args.push("--from".to_string());
                args.push(format!("project-{dep}"));
            }
            args.push(dir.join("context").display().to_string());
            CommandSpec::new("podman", args)
        }
        Stage::Push => match registry {
            Some(reg) => {
                let rendered = project.rendered_tag();
                CommandSpec::new(
                    "podman",
                    vec![
                        "push".to_string(),
                        format!("project-{}", project.id),
                        format!("{}/{}", reg.url, rendered),
                    ],
                )
            }
            None => CommandSpec::new("echo", vec!["no destination".to_string()]),
        },
        Stage::Delete => CommandSpec::new("rm", vec!["-vrf".to_string(), dir.display().to_string()]),
    }
}

/// The periodic housekeeping command run by the image-prune loop
/// (spec.md §4.8 step 7). Not keyed to any project.
pub fn prune_command() -> CommandSpec {
    CommandSpec::new(
        "podman",
        vec![
            "image".to_string(),
            "prune".to_string(),
            "-f".to_string(),
            "--filter".to_string(),
            "until=5m".to_string(),
        ],
    )
}

#[cfg(test)]
#[path = "command_table_tests.rs"]
mod tests;
