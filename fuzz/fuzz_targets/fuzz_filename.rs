// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use doc_renamer::naming::{is_valid_filename, normalize_candidate, normalize_date_suffix, sanitize_filename};

#[derive(Arbitrary, Debug)]
struct Input {
    reply_line: String,
    extension: String,
    max_length: u8,
}

fuzz_target!(|input: Input| {
    let max_length = input.max_length as usize;

    let sanitized = sanitize_filename(&input.reply_line, max_length);
    assert!(sanitized.chars().count() <= max_length);
    assert_eq!(sanitize_filename(&sanitized, max_length), sanitized);

    let candidate = normalize_candidate(&input.reply_line, &input.extension);
    if is_valid_filename(&candidate) {
        assert_eq!(normalize_date_suffix(&candidate), candidate);
    }
});
