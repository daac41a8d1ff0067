// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors for the SQL store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("project {0} not found")]
    ProjectNotFound(i64),
    #[error("task {0} not found")]
    TaskNotFound(i64),
    #[error("invalid stored state: {0}")]
    InvalidState(String),
}
