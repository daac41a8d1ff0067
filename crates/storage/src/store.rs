// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-writer SQL store (spec.md §4.6).

use crate::error::StoreError;
use parking_lot::Mutex;
use racs_core::{
    diff_backrefs, Backref, Project, ProjectConfig, ProjectId, Registry, Stage, State, Task,
    TaskId, TaskState, Trigger,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::info;

/// Partial edit to a project's metadata (`POST /project/update`, spec.md §6).
/// Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct ProjectEdit {
    pub name: Option<String>,
    pub labels: Option<String>,
    pub url: Option<String>,
    pub branch: Option<String>,
    pub destination: Option<String>,
    pub tag: Option<String>,
    pub build_spec: Option<String>,
    pub package_spec: Option<String>,
}

/// The durable catalogue of projects, tasks, registries, and triggers.
///
/// Backed by a single SQLite connection guarded by a mutex: the spec calls
/// for a "single-writer SQL database" (spec.md §2), and rusqlite's
/// `Connection` is not `Sync`, so one guarded connection is both the
/// simplest and the most literal implementation of that constraint.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (creating if absent) the store at `path`, applying schema and
    /// migrations (spec.md §4.8 step 2).
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        crate::schema::apply(&conn)?;
        info!(path = %path.display(), "opened store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::apply(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // -- projects --

    pub fn insert_project(&self, config: &ProjectConfig) -> Result<ProjectId, StoreError> {
        let state = State::success(Stage::Create);
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO projects (name, source, branch, destination, tag, buildSpec, packageSpec, state, version, labels)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9)",
            params![
                config.name,
                config.url,
                config.branch,
                config.destination,
                config.tag,
                config.build_spec,
                config.package_spec,
                state.as_db_string(),
                config.labels,
            ],
        )?;
        Ok(ProjectId::new(conn.last_insert_rowid()))
    }

    pub fn get_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let conn = self.conn.lock();
        row_to_project(&conn, id)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id FROM projects ORDER BY id")?;
        let ids: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        drop(stmt);
        ids.into_iter()
            .map(|id| {
                row_to_project(&conn, ProjectId::new(id))?
                    .ok_or(StoreError::ProjectNotFound(id))
            })
            .collect()
    }

    pub fn update_project_state(&self, id: ProjectId, state: State) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE projects SET state = ?1 WHERE id = ?2",
            params![state.as_db_string(), id.get()],
        )?;
        Ok(())
    }

    pub fn update_project_version(&self, id: ProjectId, version: u64) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE projects SET version = ?1 WHERE id = ?2",
            params![version as i64, id.get()],
        )?;
        Ok(())
    }

    pub fn update_project_build_hash(&self, id: ProjectId, hash: &[u8]) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE projects SET buildHash = ?1 WHERE id = ?2",
            params![hash, id.get()],
        )?;
        Ok(())
    }

    pub fn update_project_metadata(&self, id: ProjectId, edit: &ProjectEdit) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        macro_rules! apply_edit {
            ($field:expr, $column:literal) => {
                if let Some(value) = &$field {
                    conn.execute(
                        concat!("UPDATE projects SET ", $column, " = ?1 WHERE id = ?2"),
                        params![value, id.get()],
                    )?;
                }
            };
        }
        apply_edit!(edit.name, "name");
        apply_edit!(edit.labels, "labels");
        apply_edit!(edit.url, "source");
        apply_edit!(edit.branch, "branch");
        apply_edit!(edit.destination, "destination");
        apply_edit!(edit.tag, "tag");
        apply_edit!(edit.build_spec, "buildSpec");
        apply_edit!(edit.package_spec, "packageSpec");
        Ok(())
    }

    pub fn set_backref(
        &self,
        target: ProjectId,
        backref: Backref,
        source: Option<ProjectId>,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let column = match backref {
            Backref::PrepareDep => "prepareDep",
            Backref::PackageDep => "packageDep",
        };
        let sql = format!("UPDATE projects SET {column} = ?1 WHERE id = ?2");
        conn.execute(&sql, params![source.map(|s| s.get()), target.get()])?;
        Ok(())
    }

    /// Delete the project and its tasks (spec.md §3: "deleting the project
    /// deletes its tasks").
    pub fn delete_project(&self, id: ProjectId) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM tasks WHERE project = ?1", params![id.get()])?;
        conn.execute(
            "DELETE FROM triggers WHERE project = ?1 OR target = ?1",
            params![id.get()],
        )?;
        conn.execute("DELETE FROM projects WHERE id = ?1", params![id.get()])?;
        Ok(())
    }

    // -- tasks --

    pub fn insert_task(
        &self,
        project: ProjectId,
        kind: &str,
        created_at_ms: i64,
    ) -> Result<TaskId, StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tasks (project, type, state, time) VALUES (?1, ?2, ?3, ?4)",
            params![project.get(), kind, TaskState::Running.as_str(), created_at_ms],
        )?;
        Ok(TaskId::new(conn.last_insert_rowid()))
    }

    pub fn update_task_state(&self, id: TaskId, state: TaskState) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE tasks SET state = ?1 WHERE id = ?2",
            params![state.as_str(), id.get()],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, project, type, state, time FROM tasks WHERE id = ?1",
            params![id.get()],
            row_to_task,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Most recent tasks for a project, ordered oldest-to-newest, capped at
    /// `limit` (spec.md §3, §4.8 step 5).
    pub fn recent_tasks(&self, project: ProjectId, limit: usize) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, project, type, state, time FROM tasks WHERE project = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let mut tasks: Vec<Task> = stmt
            .query_map(params![project.get(), limit as i64], row_to_task)?
            .collect::<Result<_, _>>()?;
        tasks.reverse();
        Ok(tasks)
    }

    // -- registries --

    pub fn upsert_registry(&self, registry: &Registry) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO registries (name, url, user, password, lastLogin) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(name) DO UPDATE SET url = excluded.url, user = excluded.user, password = excluded.password, lastLogin = excluded.lastLogin",
            params![
                registry.name,
                registry.url,
                registry.user,
                registry.password,
                registry.last_login_ms,
            ],
        )?;
        Ok(())
    }

    pub fn update_registry_login(&self, name: &str, last_login_ms: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE registries SET lastLogin = ?1 WHERE name = ?2",
            params![last_login_ms, name],
        )?;
        Ok(())
    }

    pub fn list_registries(&self) -> Result<Vec<Registry>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT name, url, user, password, lastLogin FROM registries ORDER BY name")?;
        let regs = stmt
            .query_map([], |row| {
                Ok(Registry {
                    name: row.get(0)?,
                    url: row.get(1)?,
                    user: row.get(2)?,
                    password: row.get(3)?,
                    last_login_ms: row.get(4)?,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(regs)
    }

    pub fn get_registry(&self, name: &str) -> Result<Option<Registry>, StoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT name, url, user, password, lastLogin FROM registries WHERE name = ?1",
            params![name],
            |row| {
                Ok(Registry {
                    name: row.get(0)?,
                    url: row.get(1)?,
                    user: row.get(2)?,
                    password: row.get(3)?,
                    last_login_ms: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(Into::into)
    }

    // -- triggers --

    /// Full replace of `source`'s outgoing triggers: drop prior edges,
    /// clear back-references they installed, install the new edges, and
    /// attach their back-references (spec.md §4.7).
    pub fn replace_triggers(&self, source: ProjectId, new_edges: &[Trigger]) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let old_edges = {
            let mut stmt = conn.prepare(
                "SELECT project, target, state FROM triggers WHERE project = ?1",
            )?;
            let rows: Vec<Trigger> = stmt
                .query_map(params![source.get()], row_to_trigger)?
                .collect::<Result<_, _>>()?;
            rows
        };

        let (clears, installs) = diff_backrefs(source, &old_edges, new_edges);

        conn.execute("DELETE FROM triggers WHERE project = ?1", params![source.get()])?;
        for edge in new_edges {
            conn.execute(
                "INSERT INTO triggers (project, target, state) VALUES (?1, ?2, ?3)",
                params![edge.source.get(), edge.target.get(), edge.stage.as_str()],
            )?;
        }

        for (target, backref) in clears {
            let column = match backref {
                Backref::PrepareDep => "prepareDep",
                Backref::PackageDep => "packageDep",
            };
            let sql = format!("UPDATE projects SET {column} = NULL WHERE id = ?1");
            conn.execute(&sql, params![target.get()])?;
        }
        for (target, backref, src) in installs {
            let column = match backref {
                Backref::PrepareDep => "prepareDep",
                Backref::PackageDep => "packageDep",
            };
            let sql = format!("UPDATE projects SET {column} = ?1 WHERE id = ?2");
            conn.execute(&sql, params![src.get(), target.get()])?;
        }
        Ok(())
    }

    pub fn triggers_from(&self, source: ProjectId) -> Result<Vec<Trigger>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT project, target, state FROM triggers WHERE project = ?1")?;
        let rows = stmt
            .query_map(params![source.get()], row_to_trigger)?
            .collect::<Result<_, _>>()?;
        Ok(rows)
    }

    pub fn all_triggers(&self) -> Result<Vec<Trigger>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT project, target, state FROM triggers")?;
        let rows = stmt.query_map([], row_to_trigger)?.collect::<Result<_, _>>()?;
        Ok(rows)
    }
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let state_str: String = row.get(3)?;
    let state = TaskState::from_str(&state_str).unwrap_or(TaskState::Error);
    Ok(Task {
        id: TaskId::new(row.get(0)?),
        project: ProjectId::new(row.get(1)?),
        kind: row.get(2)?,
        state,
        created_at_ms: row.get(4)?,
    })
}

fn row_to_trigger(row: &rusqlite::Row) -> rusqlite::Result<Trigger> {
    let stage_str: String = row.get(2)?;
    let stage = Stage::ALL
        .iter()
        .copied()
        .find(|s| s.as_str() == stage_str)
        .unwrap_or(Stage::Push);
    Ok(Trigger {
        source: ProjectId::new(row.get(0)?),
        target: ProjectId::new(row.get(1)?),
        stage,
    })
}

fn row_to_project(conn: &Connection, id: ProjectId) -> Result<Option<Project>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, name, source, branch, destination, tag, buildSpec, packageSpec, buildHash, labels, state, version, prepareDep, packageDep
             FROM projects WHERE id = ?1",
            params![id.get()],
            |row| {
                let state_str: String = row.get(10)?;
                let build_hash: Option<Vec<u8>> = row.get(8)?;
                Ok((
                    ProjectId::new(row.get(0)?),
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    build_hash.unwrap_or_default(),
                    row.get::<_, String>(9)?,
                    state_str,
                    row.get::<_, i64>(11)?,
                    row.get::<_, Option<i64>>(12)?,
                    row.get::<_, Option<i64>>(13)?,
                ))
            },
        )
        .optional()?;

    let Some((
        id,
        name,
        source,
        branch,
        destination,
        tag,
        build_spec,
        package_spec,
        build_hash,
        labels,
        state_str,
        version,
        prepare_dep,
        package_dep,
    )) = row
    else {
        return Ok(None);
    };

    let state = State::from_db_string(&state_str)
        .ok_or_else(|| StoreError::InvalidState(state_str.clone()))?;

    Ok(Some(Project {
        id,
        name,
        labels,
        url: source,
        branch,
        destination,
        tag,
        build_spec,
        package_spec,
        build_hash,
        state,
        version: version as u64,
        tasks: Default::default(),
        triggers: Vec::new(),
        prepare_dep: prepare_dep.map(ProjectId::new),
        package_dep: package_dep.map(ProjectId::new),
    }))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
