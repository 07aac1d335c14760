// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Plain text and CSV extractor

use std::path::Path;

use super::TextExtractor;
use crate::Result;

/// Reads text files whole, dropping bytes that are not valid UTF-8
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "csv"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        Ok(decode_lossy(&bytes))
    }
}

/// UTF-8 decode that discards undecodable bytes instead of failing
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bytes_are_dropped() {
        let bytes = b"caf\xc3\xa9 \xff\xfeplan";
        assert_eq!(decode_lossy(bytes), "café plan");
    }

    #[test]
    fn test_reads_csv_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "name,date\nGemeente,01-02-2024\n").unwrap();

        let text = PlainTextExtractor::new().extract(&path).unwrap();
        assert_eq!(text, "name,date\nGemeente,01-02-2024\n");
    }

    #[test]
    fn test_missing_file_propagates() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PlainTextExtractor::new().extract(&dir.path().join("gone.txt")).is_err());
    }
}
