// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-spec content hashing for the PULL post-hook (spec.md §4.1).

use racs_core::hash::sha256;
use std::path::Path;

pub fn hash_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    Ok(sha256(&bytes))
}

#[cfg(test)]
#[path = "hash_check_tests.rs"]
mod tests;
