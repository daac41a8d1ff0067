// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integer identifier newtypes assigned by the store.
//!
//! Unlike a generated UUID, these are handed out by SQLite's `AUTOINCREMENT`
//! on insert, so the wrapper only needs to carry the `i64` and format it.

/// Define a newtype ID wrapper around `i64`.
///
/// Generates `new()`, `get()`, `Display`, `From<i64>`, `From<T> for i64`, and
/// serde support (serialized as a bare integer, matching the wire events in
/// spec.md §4.5).
macro_rules! define_int_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_int_id! {
    /// Unique identifier for a registered project.
    pub struct ProjectId;
}

define_int_id! {
    /// Unique identifier for a task (one pipeline action's execution record).
    pub struct TaskId;
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
