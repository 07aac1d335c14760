// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filename candidates: prompt construction and reply validation
//!
//! Accepted names follow `institution_subject_DD-MM-YYYY`: at least three
//! underscore-separated segments, every segment but the last `[a-z0-9]+`,
//! the last one a `DD-MM-YYYY` date.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::ollama::CompletionBackend;
use crate::{AppConfig, RenamerError, Result};

static MARKUP_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[*"`:\[\](){}]"#).unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());
static TRAILING_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{2})[_-]([0-9]{2})[_-]([0-9]{4})$").unwrap());
static DATE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").unwrap());
static WORD_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]+$").unwrap());

/// Prefix models copy from reply-quoting conventions
const REPLY_PREFIX: &str = "re_";

const DEFAULT_PROMPT: &str = "\
You are a function that produces a valid filename from the text content of a document.

Format:
[institution]_[subject]_[documentdate]

Rules:
- Lowercase letters only
- Only underscores (_) between words
- No hyphens, brackets, quotes or other special characters
- Only letters, digits and underscores are allowed
- The date MUST be exactly: 2 digits for the day, a hyphen (-), 2 digits for the month, a hyphen (-), 4 digits for the year. Example: 24-05-2024
- Do not add an extension (.pdf etc.)
- Return a single line, without explanation, code or labels

Institution:
- Use only an organisation or company that is explicitly named in the text
- Never use words such as \"birth\", \"income\", \"address\", \"processing\" or \"tax\" unless they really are the name of an organisation
- If no clear institution is found, use `{unknown}`

Subject:
- Use a recognisable title or heading such as 'consent', 'statement', 'screening' or 'contract'
- Keep the subject short and descriptive (at most 3 words)

Date:
- If no date can be found, use {fallback_date}

--- Text content ---
{text}
--- END ---
";

/// Asks a completion backend for a name and keeps the first valid reply line
pub struct CandidateGenerator {
    backend: Box<dyn CompletionBackend>,
    max_text_length: usize,
    template: String,
    unknown_token: String,
    fallback_date: String,
}

impl CandidateGenerator {
    pub fn new(backend: Box<dyn CompletionBackend>, config: &AppConfig) -> Self {
        Self {
            backend,
            max_text_length: config.limits.max_text_length,
            template: config
                .naming
                .prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            unknown_token: config.naming.unknown_token.clone(),
            fallback_date: config.naming.fallback_date.clone(),
        }
    }

    /// Embed the bounded text excerpt into the prompt template
    pub fn build_prompt(&self, text: &str) -> String {
        let excerpt = truncate_chars(text, self.max_text_length);
        self.template
            .replace("{unknown}", &self.unknown_token)
            .replace("{fallback_date}", &self.fallback_date)
            .replace("{text}", excerpt)
    }

    /// Propose a validated filename (no extension) for `text`.
    ///
    /// `extension` is the source file's extension, with or without the dot.
    pub async fn generate(&self, text: &str, extension: &str) -> Result<String> {
        let prompt = self.build_prompt(text);
        let reply = self.backend.complete(&prompt).await?;
        debug!("Model reply: {:?}", reply);

        select_candidate(&reply, extension).ok_or_else(|| RenamerError::NoValidCandidate {
            reply: reply.trim().to_string(),
        })
    }
}

/// First reply line that normalizes into a valid filename
pub fn select_candidate(reply: &str, extension: &str) -> Option<String> {
    reply
        .trim()
        .lines()
        .map(|line| normalize_candidate(line, extension))
        .find(|candidate| is_valid_filename(candidate))
}

/// Run one reply line through the cleanup steps, in order
pub fn normalize_candidate(line: &str, extension: &str) -> String {
    let cleaned = line.trim().to_lowercase();
    let cleaned = MARKUP_CHARS.replace_all(&cleaned, "");
    let cleaned = WHITESPACE.replace_all(cleaned.trim(), "_");
    let cleaned = strip_extension(&cleaned, extension);
    let cleaned = cleaned.strip_prefix(REPLY_PREFIX).unwrap_or(cleaned);
    let cleaned = strip_accents(cleaned);
    let cleaned = UNDERSCORES.replace_all(&cleaned, "_");
    normalize_date_suffix(&cleaned)
}

/// Drop a trailing `.pdf`, or the source file's own extension
fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    if let Some(stripped) = name.strip_suffix(".pdf") {
        return stripped;
    }

    let ext = extension.trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        return name;
    }
    name.strip_suffix(ext.as_str())
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(name)
}

/// Decompose and drop combining marks: `café` becomes `cafe`
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Rewrite a trailing `DD[-_]MM[-_]YYYY` date to `DD-MM-YYYY`
pub fn normalize_date_suffix(name: &str) -> String {
    TRAILING_DATE.replace(name, "$1-$2-$3").into_owned()
}

/// Check a name against the `token_token_..._DD-MM-YYYY` grammar
pub fn is_valid_filename(name: &str) -> bool {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 3 {
        return false;
    }

    let (date, words) = match parts.split_last() {
        Some(split) => split,
        None => return false,
    };

    DATE_SEGMENT.is_match(date) && words.iter().all(|w| WORD_SEGMENT.is_match(w))
}

/// First `max` characters of `text`, never splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
