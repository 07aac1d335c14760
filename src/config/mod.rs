// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for doc-renamer

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Input and output directories
    #[serde(default)]
    pub paths: PathConfig,

    /// AI engine configuration
    #[serde(default)]
    pub ai_engine: EngineConfig,

    /// Text and filename length caps
    #[serde(default)]
    pub limits: LimitConfig,

    /// Naming grammar placeholders and prompt template
    #[serde(default)]
    pub naming: NamingConfig,

    /// Extensions the batch attempts; everything else is skipped
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// OCR settings for image inputs
    #[serde(default)]
    pub ocr: OcrConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PathConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Extra attempts after a failed inference call (0 = single attempt)
    #[serde(default)]
    pub retries: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LimitConfig {
    /// Characters of extracted text embedded in the prompt
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    /// Characters kept from a sanitized name, extension excluded
    #[serde(default = "default_max_filename_length")]
    pub max_filename_length: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NamingConfig {
    /// Institution placeholder and fallback-name marker
    #[serde(default = "default_unknown_token")]
    pub unknown_token: String,
    /// Date used when the document carries none
    #[serde(default = "default_fallback_date")]
    pub fallback_date: String,
    /// Prompt template override; supports `{text}`, `{unknown}` and
    /// `{fallback_date}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_command")]
    pub command: String,
    #[serde(default = "default_ocr_languages")]
    pub languages: String,
    /// Leading OCR lines repeated ahead of the full text
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
}

// Default value functions
fn default_input_dir() -> PathBuf { PathBuf::from("./input") }
fn default_output_dir() -> PathBuf { PathBuf::from("./output") }
fn default_url() -> String { "http://localhost:11434/api/generate".to_string() }
fn default_model() -> String { "llama3.1".to_string() }
fn default_timeout() -> u64 { 120 }
fn default_max_text_length() -> usize { 2000 }
fn default_max_filename_length() -> usize { 100 }
fn default_unknown_token() -> String { "unknown".to_string() }
fn default_fallback_date() -> String { "01-01-1900".to_string() }
fn default_ocr_command() -> String { "tesseract".to_string() }
fn default_ocr_languages() -> String { "eng".to_string() }
fn default_header_lines() -> usize { 10 }

fn default_extensions() -> Vec<String> {
    vec!["pdf", "txt", "csv", "xlsx", "xls", "docx", "jpg", "jpeg", "png"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathConfig::default(),
            ai_engine: EngineConfig::default(),
            limits: LimitConfig::default(),
            naming: NamingConfig::default(),
            extensions: default_extensions(),
            ocr: OcrConfig::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            retries: 0,
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
            max_filename_length: default_max_filename_length(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            unknown_token: default_unknown_token(),
            fallback_date: default_fallback_date(),
            prompt: None,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: default_ocr_command(),
            languages: default_ocr_languages(),
            header_lines: default_header_lines(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::RenamerError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings no batch could run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.limits.max_filename_length == 0 {
            return Err(crate::RenamerError::Config(
                "limits.max_filename_length must be greater than zero".to_string(),
            ));
        }
        if self.ai_engine.timeout_secs == 0 {
            return Err(crate::RenamerError::Config(
                "ai_engine.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.naming.unknown_token.is_empty() {
            return Err(crate::RenamerError::Config(
                "naming.unknown_token must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the batch attempts files with this extension (no leading dot)
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
