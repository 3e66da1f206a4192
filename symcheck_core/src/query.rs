//! Query validation, sanitization and tokenization.
//!
//! A raw query passes through [`validate_query`] first (length checks and
//! character filtering), then [`tokenize`] turns the sanitized text into
//! normalized symptom terms comparable with dataset column names.

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Length bounds for a raw symptom query, counted in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            min_len: 2,
            max_len: 500,
        }
    }
}

const fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ',' | ' ' | '-')
}

/// `;` separates terms like `,` does, and `_` spells a space in column names.
const fn fold_separator(c: char) -> char {
    match c {
        ';' => ',',
        '_' => ' ',
        other => other,
    }
}

/// Validate a raw query and return its sanitized text.
///
/// Checks run in order: empty, too long, too short, then sanitization.
/// Length is checked on the trimmed input before anything is stripped, so an
/// oversized query is rejected without being tokenized.
pub fn validate_query(raw: &str, limits: QueryLimits) -> Result<String, MatchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MatchError::EmptyInput);
    }

    let len = trimmed.chars().count();
    if len > limits.max_len {
        return Err(MatchError::InputTooLong {
            max: limits.max_len,
        });
    }
    if len < limits.min_len {
        return Err(MatchError::InputTooShort {
            min: limits.min_len,
        });
    }

    let sanitized: String = trimmed
        .chars()
        .map(fold_separator)
        .filter(|c| is_allowed(*c))
        .collect();
    let sanitized = sanitized.trim().to_string();

    if tokenize(&sanitized).is_empty() {
        return Err(MatchError::InvalidCharacters);
    }

    Ok(sanitized)
}

/// Split a query into normalized symptom terms.
///
/// Empty terms and terms that normalize to nothing are dropped.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(normalize_name)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Normalize a symptom term or column name for comparison.
///
/// Lower-cases, turns whitespace, hyphens and underscores into a single
/// underscore and trims underscores from both ends:
/// `"Sore - Throat"` becomes `"sore_throat"`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}
