// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema creation and idempotent migrations (spec.md §4.6, §4.8 step 2).

use crate::error::StoreError;
use rusqlite::Connection;

const CREATE_PROJECTS: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    source TEXT NOT NULL,
    branch TEXT NOT NULL,
    destination TEXT NOT NULL,
    tag TEXT NOT NULL,
    buildSpec TEXT NOT NULL,
    packageSpec TEXT NOT NULL,
    state TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    prepareDep INTEGER,
    packageDep INTEGER
)";

const CREATE_TASKS: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project INTEGER NOT NULL REFERENCES projects(id),
    type TEXT NOT NULL,
    state TEXT NOT NULL,
    time INTEGER NOT NULL
)";

const CREATE_REGISTRIES: &str = "
CREATE TABLE IF NOT EXISTS registries (
    name TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    user TEXT NOT NULL DEFAULT '',
    password TEXT NOT NULL DEFAULT '',
    lastLogin INTEGER
)";

const CREATE_TRIGGERS: &str = "
CREATE TABLE IF NOT EXISTS triggers (
    project INTEGER NOT NULL REFERENCES projects(id),
    target INTEGER NOT NULL REFERENCES projects(id),
    state TEXT NOT NULL
)";

/// Apply schema creation statements and the two idempotent column additions
/// (`buildHash`, `labels`). Additions failing because the column already
/// exists are ignored (spec.md §4.8 step 2).
pub fn apply(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(CREATE_PROJECTS)?;
    conn.execute_batch(CREATE_TASKS)?;
    conn.execute_batch(CREATE_REGISTRIES)?;
    conn.execute_batch(CREATE_TRIGGERS)?;

    add_column_if_missing(conn, "projects", "buildHash", "BLOB")?;
    add_column_if_missing(conn, "projects", "labels", "TEXT NOT NULL DEFAULT ''")?;
    Ok(())
}

fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    decl: &str,
) -> Result<(), StoreError> {
    let sql = format!("ALTER TABLE {table} ADD COLUMN {column} {decl}");
    match conn.execute(&sql, []) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(_, Some(msg)))
            if msg.contains("duplicate column name") =>
        {
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
