// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-spec content hashing (spec.md §4.1 PULL post-hook).

use sha2::{Digest, Sha256};

/// SHA-256 of the given bytes, as used to detect build-spec changes after a
/// successful pull.
pub fn sha256(bytes: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().to_vec()
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
