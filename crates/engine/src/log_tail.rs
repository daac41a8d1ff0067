// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task log tail reading for `GET /task/logs?id&offset` (spec.md §6). Not
//! named in spec.md beyond the endpoint and the `X-Task-State` response
//! header; this module gives it concrete seek-and-read mechanics.

use racs_core::TaskState;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Result of one `/task/logs` read: the bytes from `offset` to current
/// EOF, and the task's state at the time of the read (for `X-Task-State`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTail {
    pub body: Vec<u8>,
    pub state: TaskState,
}

/// Reads `log_path` from `offset` to EOF. `offset` past EOF (or a log file
/// that hasn't been created yet, e.g. before the executor writes its
/// header) yields an empty body rather than an error (spec.md §8
/// scenario 6).
pub fn read_tail(log_path: &Path, offset: u64, state: TaskState) -> std::io::Result<LogTail> {
    let mut file = match std::fs::File::open(log_path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(LogTail { body: Vec::new(), state });
        }
        Err(err) => return Err(err),
    };

    let len = file.metadata()?.len();
    if offset >= len {
        return Ok(LogTail { body: Vec::new(), state });
    }

    file.seek(SeekFrom::Start(offset))?;
    let mut body = Vec::with_capacity((len - offset) as usize);
    file.read_to_end(&mut body)?;
    Ok(LogTail { body, state })
}

#[cfg(test)]
#[path = "log_tail_tests.rs"]
mod tests;
