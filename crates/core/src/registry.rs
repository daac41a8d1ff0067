// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container registry records.

use serde::{Deserialize, Serialize};

/// A configured push destination.
///
/// Password is stored in plaintext — this preserves the source's behavior
/// (spec.md §3) rather than introducing new semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub name: String,
    pub url: String,
    pub user: String,
    pub password: String,
    /// Epoch milliseconds of the last successful login, if any.
    pub last_login_ms: Option<i64>,
}

impl Registry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            user: String::new(),
            password: String::new(),
            last_login_ms: None,
        }
    }

    /// Login is refreshed lazily when older than 1 hour and `user` is
    /// non-empty (spec.md §3).
    pub fn needs_login(&self, now_epoch_ms: i64) -> bool {
        if self.user.is_empty() {
            return false;
        }
        const ONE_HOUR_MS: i64 = 3_600_000;
        match self.last_login_ms {
            None => true,
            Some(last) => now_epoch_ms.saturating_sub(last) >= ONE_HOUR_MS,
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
