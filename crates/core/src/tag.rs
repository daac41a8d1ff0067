// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tag template rendering.

/// Render a tag template by substituting the literal token `$VERSION` with
/// the decimal form of `version`.
///
/// spec.md §9 calls out that one of the two source variants renders the
/// version as a single Unicode code point instead of decimal digits; this
/// implementation always produces decimal digits.
pub fn render_tag(template: &str, version: u64) -> String {
    template.replace("$VERSION", &version.to_string())
}

#[cfg(test)]
#[path = "tag_tests.rs"]
mod tests;
