// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared across the core data model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown pipeline state code: {0}")]
    UnknownStateCode(i32),
    #[error("unknown pipeline state string: {0}")]
    UnknownStateString(String),
    #[error("trigger stage {0} is not a valid trigger target")]
    InvalidTriggerStage(String),
}
