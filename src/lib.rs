// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! doc-renamer: content-based batch renaming with a local language model
//!
//! Reads every document in an input directory, extracts its text, asks an
//! Ollama model for an `institution_subject_DD-MM-YYYY` name and copies the
//! file into the output directory under that name. Files that cannot be
//! named are copied under a fallback name instead, so a batch never drops
//! an input it attempted.

pub mod batch;
pub mod config;
pub mod error;
pub mod extractors;
pub mod naming;
pub mod ollama;

pub use config::AppConfig;
pub use error::{RenamerError, Result};
