//! Advisory spintax validation.
//!
//! Nothing in the resolution path calls this. Callers that persist a
//! template (draft saving) run it first and decide what to do with the
//! report.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::spintax::engine::extract_options;

/// An opening brace reached again before any closing brace.
static NESTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\{").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks brace balance, nesting and empty options, collecting every failure.
pub fn validate(text: &str) -> ValidationReport {
    let mut errors = Vec::new();

    let open = text.matches('{').count();
    let close = text.matches('}').count();
    if open != close {
        errors.push(format!(
            "Unbalanced braces: {open} opening and {close} closing"
        ));
    }

    if NESTED_RE.is_match(text) {
        errors.push("Nested spintax is not supported".to_string());
    }

    let has_empty_option = extract_options(text)
        .iter()
        .any(|options| options.iter().any(String::is_empty));
    if has_empty_option {
        errors.push("Empty spintax options found".to_string());
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
