// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for doc-renamer

use thiserror::Error;

/// Result type alias for doc-renamer operations
pub type Result<T> = std::result::Result<T, RenamerError>;

/// doc-renamer error types
#[derive(Error, Debug)]
pub enum RenamerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Inference call failed: {0}")]
    Inference(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No valid filename candidate in model reply: {reply:?}")]
    NoValidCandidate { reply: String },
}
