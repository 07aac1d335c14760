// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Text extractors for the supported document formats

pub mod docx;
pub mod image;
pub mod pdf;
pub mod plain;
pub mod spreadsheet;

use std::path::Path;

use crate::{AppConfig, RenamerError, Result};

/// Trait for format-specific text extraction
pub trait TextExtractor: Send + Sync {
    /// Name of this extractor
    fn name(&self) -> &'static str;

    /// File extensions this extractor handles (lowercase, no dot)
    fn supported_extensions(&self) -> &[&str];

    /// Check if this extractor can handle a file
    fn can_handle(&self, path: &Path) -> bool {
        match file_extension(path) {
            Some(ext) => self.supported_extensions().iter().any(|e| *e == ext),
            None => false,
        }
    }

    /// Produce plain text representative of the document
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Registry of all text extractors
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a registry with one extractor per supported format
    pub fn new(config: &AppConfig) -> Self {
        let mut registry = Self {
            extractors: Vec::new(),
        };

        registry.register(Box::new(pdf::PdfExtractor::new()));
        registry.register(Box::new(plain::PlainTextExtractor::new()));
        registry.register(Box::new(spreadsheet::SpreadsheetExtractor::new()));
        registry.register(Box::new(docx::DocxExtractor::new()));
        registry.register(Box::new(image::OcrExtractor::new(&config.ocr)));

        registry
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Register a new extractor; later registrations win for shared extensions
    pub fn register(&mut self, extractor: Box<dyn TextExtractor>) {
        self.extractors.insert(0, extractor);
    }

    /// Find the extractor for a file
    pub fn find_extractor(&self, path: &Path) -> Option<&dyn TextExtractor> {
        self.extractors.iter()
            .find(|e| e.can_handle(path))
            .map(|e| e.as_ref())
    }

    /// Extract text, dispatching on the file extension
    pub fn extract(&self, path: &Path) -> Result<String> {
        let extractor = self.find_extractor(path).ok_or_else(|| {
            RenamerError::UnsupportedFileType(file_extension(path).unwrap_or_default())
        })?;

        tracing::debug!("Extracting {:?} with {}", path, extractor.name());
        extractor.extract(path)
    }

    /// Get extractor names
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Get number of registered extractors
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

/// Lowercased extension of `path`, without the dot
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
