// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filename generation, validation and sanitization

pub mod candidate;
pub mod sanitize;

use chrono::{DateTime, Local};

pub use candidate::{
    is_valid_filename, normalize_candidate, normalize_date_suffix, select_candidate, strip_accents,
    CandidateGenerator,
};
pub use sanitize::sanitize_filename;

/// Name used when no validated candidate could be produced:
/// `<unknown>_<stem>_<YYYYMMDDHHMMSS><ext>`
///
/// `extension` is appended verbatim and should include its leading dot.
pub fn fallback_filename(unknown_token: &str, stem: &str, extension: &str, now: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}{}",
        unknown_token,
        stem,
        now.format("%Y%m%d%H%M%S"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fallback_filename_format() {
        let now = Local.with_ymd_and_hms(2024, 5, 24, 9, 3, 7).unwrap();
        assert_eq!(
            fallback_filename("unknown", "Scan 0012", ".pdf", now),
            "unknown_Scan 0012_20240524090307.pdf"
        );
    }
}
