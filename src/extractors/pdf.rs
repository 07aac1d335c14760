// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! PDF text extractor

use std::path::Path;
use tracing::{debug, warn};

use super::TextExtractor;
use crate::{RenamerError, Result};

/// Extractor for PDF files
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Per-page text joined with newlines
    fn extract_pages(bytes: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| RenamerError::Pdf(format!("Failed to load PDF: {}", e)))?;

        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    debug!("No text on page {}: {}", page_number, e);
                    pages.push(String::new());
                }
            }
        }

        Ok(pages.join("\n"))
    }

    /// Whole-document extraction, more tolerant of unusual font encodings
    fn extract_whole(bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| RenamerError::Pdf(format!("Text extraction failed: {}", e)))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;

        // pdf-extract parses with lopdf too, so a load failure is final
        let text = Self::extract_pages(&bytes)?;
        if !text.trim().is_empty() {
            return Ok(text);
        }

        debug!("Page extraction yielded no text for {:?}, retrying whole document", path);
        match Self::extract_whole(&bytes) {
            Ok(whole) => Ok(whole),
            Err(e) => {
                warn!("Whole-document extraction failed for {:?}: {}", path, e);
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// One line of Courier text per page
    fn write_pdf(path: &Path, pages: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for line in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_pages_joined_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.pdf");
        write_pdf(&path, &["Gemeente Utrecht", "Parkeervergunning 12-03-2024"]);

        let text = PdfExtractor::new().extract(&path).unwrap();

        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["Gemeente Utrecht", "Parkeervergunning 12-03-2024"]);
        // Page boundary is a line break, never a run-on
        assert!(!text.contains("UtrechtParkeervergunning"));
    }

    #[test]
    fn test_page_texts_are_newline_joined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.pdf");
        write_pdf(&path, &["KPN", "Factuur"]);

        let bytes = std::fs::read(&path).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let first = doc.extract_text(&[1]).unwrap();
        let second = doc.extract_text(&[2]).unwrap();

        assert_eq!(PdfExtractor::extract_pages(&bytes).unwrap(), format!("{}\n{}", first, second));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        assert!(PdfExtractor::new().extract(&path).is_err());
    }

    #[test]
    fn test_handles_only_pdf() {
        let extractor = PdfExtractor::new();
        assert!(extractor.can_handle(Path::new("scan.PDF")));
        assert!(!extractor.can_handle(Path::new("scan.pdf.txt")));
    }
}
