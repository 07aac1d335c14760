// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filesystem-safe filename sanitization

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_.]").unwrap());
static UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Lowercase, replace anything outside `[a-z0-9_.]` with `_`, collapse
/// underscore runs, drop an underscore sitting right before a dot, then cut
/// to `max_length` characters.
///
/// Total and idempotent. The cut is not grammar-aware and may drop the date.
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    let clean = name.trim().to_lowercase();
    let clean = DISALLOWED.replace_all(&clean, "_");
    let clean = UNDERSCORES.replace_all(&clean, "_");
    let mut clean = clean.replace("_.", ".");

    // Only ASCII survives the filter above, so byte length equals char count
    clean.truncate(max_length.min(clean.len()));
    clean
}
