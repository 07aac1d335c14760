// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Image extractor using Tesseract OCR

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

use super::TextExtractor;
use crate::config::OcrConfig;
use crate::{RenamerError, Result};

/// OCR extractor for scans and photographs of documents.
///
/// Never fails: recognition problems are logged and yield empty text.
pub struct OcrExtractor {
    command: String,
    languages: String,
    header_lines: usize,
}

impl OcrExtractor {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            languages: config.languages.clone(),
            header_lines: config.header_lines,
        }
    }

    /// Locate the tesseract binary on PATH
    fn tesseract(&self) -> Result<PathBuf> {
        which::which(&self.command).map_err(|e| {
            RenamerError::Ocr(format!("'{}' not found on PATH: {}", self.command, e))
        })
    }

    /// Decode, convert to grayscale PNG and run tesseract on it
    fn recognize(&self, path: &Path) -> Result<String> {
        let binary = self.tesseract()?;

        // Resize large images for faster processing
        let img = image::open(path)?;
        let img = if img.width() > 4000 || img.height() > 4000 {
            img.resize(4000, 4000, image::imageops::FilterType::Triangle)
        } else {
            img
        };

        let scratch = tempfile::Builder::new()
            .prefix("doc-renamer-ocr")
            .suffix(".png")
            .tempfile()?;
        img.grayscale().save_with_format(scratch.path(), image::ImageFormat::Png)?;

        debug!("Running {:?} on {:?} (lang={})", binary, path, self.languages);

        let output = Command::new(&binary)
            .arg(scratch.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .output()?;

        if !output.status.success() {
            return Err(RenamerError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TextExtractor for OcrExtractor {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["jpg", "jpeg", "png"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        match self.recognize(path) {
            Ok(text) => Ok(with_header(&text, self.header_lines)),
            Err(e) => {
                warn!("OCR failed for {:?}: {}", path, e);
                Ok(String::new())
            }
        }
    }
}

/// Repeat the first `lines` lines ahead of the full text so letterheads land
/// inside the prompt excerpt
pub fn with_header(text: &str, lines: usize) -> String {
    let header = text.lines().take(lines).collect::<Vec<_>>().join("\n");
    format!("{}\n\n{}", header, text)
}
