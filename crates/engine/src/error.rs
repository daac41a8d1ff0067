// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use racs_core::ProjectId;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Store(#[from] racs_storage::StoreError),

    #[error("project {0} is not registered")]
    UnknownProject(ProjectId),

    #[error("project {0}'s worker queue is no longer accepting actions")]
    QueueClosed(ProjectId),

    #[error("io error running command: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry {0:?} is not configured")]
    UnknownRegistry(String),
}
