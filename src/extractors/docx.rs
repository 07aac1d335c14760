// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Word-processor (DOCX) extractor

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;

use super::TextExtractor;
use crate::{RenamerError, Result};

/// Extractor for DOCX documents, one output line per paragraph
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| RenamerError::Extraction(format!("Failed to open DOCX: {}", e)))?;

        // DOCX stores content in word/document.xml
        let mut document_xml = archive
            .by_name("word/document.xml")
            .map_err(|_| RenamerError::Extraction("No document.xml found".to_string()))?;

        let mut content = String::new();
        document_xml.read_to_string(&mut content)?;

        paragraphs_from_xml(&content).map(|paragraphs| paragraphs.join("\n"))
    }
}

/// Collect the text of every `w:p` paragraph in document order.
///
/// Paragraphs nest inside text boxes (`w:txbxContent`); each one keeps its
/// own slot, ordered by where it starts.
pub fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    // Indices into `paragraphs` of the currently open `w:p` elements
    let mut open: Vec<usize> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:p" => {
                    open.push(paragraphs.len());
                    paragraphs.push(String::new());
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                let current = open.last().copied();
                match (e.name().as_ref(), current) {
                    // Self-closing paragraph
                    (b"w:p", _) => paragraphs.push(String::new()),
                    (b"w:tab", Some(i)) => paragraphs[i].push('\t'),
                    (b"w:br" | b"w:cr", Some(i)) => paragraphs[i].push(' '),
                    _ => {}
                }
            }
            Ok(Event::Text(t)) if in_text => {
                if let Some(&i) = open.last() {
                    let text = t
                        .unescape()
                        .map_err(|e| RenamerError::Extraction(format!("Bad DOCX text: {}", e)))?;
                    paragraphs[i].push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    open.pop();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RenamerError::Extraction(format!(
                    "Malformed document.xml at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}
