//! Message generation: spintax resolution followed by placeholder filling.
//!
//! Fields are filled *after* resolution so user-supplied values (a company
//! called `{Acme}`, say) are never parsed as spintax.

use std::collections::{BTreeSet, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::spintax::{get_variation_count, resolve_with, validate, OptionPicker, ValidationReport};

/// Resolution attempts per requested message before giving up on uniqueness.
const ATTEMPTS_PER_MESSAGE: usize = 3;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([a-z][a-z0-9_]*)\]").unwrap());

/// Subject and body of a message before generation.
#[derive(Debug, Clone, Copy)]
pub struct MessageSource<'a> {
    pub subject: Option<&'a str>,
    pub body: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GeneratedMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedBatch {
    pub messages: Vec<GeneratedMessage>,
    /// Placeholders in the template with no value in the field map.
    pub missing_fields: Vec<String>,
    /// Advisory lint of the body; generation proceeds regardless.
    pub validation: ValidationReport,
}

/// Replaces every `[key]` whose key is present in `fields`.
pub fn fill_fields(text: &str, fields: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| match fields.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Placeholder keys in `text` that `fields` does not provide, sorted and unique.
pub fn missing_fields(text: &str, fields: &HashMap<String, String>) -> Vec<String> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|key| !fields.contains_key(key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolves `source` into up to `count` distinct messages.
///
/// `count` is first capped at the number of distinct messages the template
/// can produce. Stops early once `count * ATTEMPTS_PER_MESSAGE` resolutions
/// have been tried, so templates with few variations may return fewer.
pub fn generate_messages(
    source: MessageSource<'_>,
    fields: &HashMap<String, String>,
    count: usize,
    picker: &mut impl OptionPicker,
) -> GeneratedBatch {
    let possible = get_variation_count(source.body)
        .saturating_mul(source.subject.map_or(1, get_variation_count));
    let count = count.min(usize::try_from(possible).unwrap_or(usize::MAX));

    let mut seen = HashSet::new();
    let mut messages = Vec::with_capacity(count);

    for _ in 0..count.saturating_mul(ATTEMPTS_PER_MESSAGE) {
        if messages.len() >= count {
            break;
        }
        let message = GeneratedMessage {
            subject: source
                .subject
                .map(|s| fill_fields(&resolve_with(s, picker), fields)),
            body: fill_fields(&resolve_with(source.body, picker), fields),
        };
        if seen.insert(message.clone()) {
            messages.push(message);
        }
    }

    let mut missing: BTreeSet<String> = missing_fields(source.body, fields).into_iter().collect();
    if let Some(subject) = source.subject {
        missing.extend(missing_fields(subject, fields));
    }

    GeneratedBatch {
        messages,
        missing_fields: missing.into_iter().collect(),
        validation: validate(source.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spintax::RandomPicker;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_fill_known_fields_only() {
        let f = fields(&[("name", "Budi"), ("company", "Acme")]);
        assert_eq!(
            fill_fields("Hi [name] from [company], re [position]", &f),
            "Hi Budi from Acme, re [position]"
        );
    }

    #[test]
    fn test_fill_ignores_non_placeholder_brackets() {
        let f = fields(&[("name", "Budi")]);
        assert_eq!(fill_fields("[Name] [ name ] [name]", &f), "[Name] [ name ] Budi");
    }

    #[test]
    fn test_missing_fields_sorted_unique() {
        let f = fields(&[("name", "Budi")]);
        assert_eq!(
            missing_fields("[position] [name] [company] [position]", &f),
            vec!["company", "position"]
        );
    }

    #[test]
    fn test_field_values_are_not_spintax() {
        let f = fields(&[("company", "{Acme|Globex}")]);
        let source = MessageSource {
            subject: None,
            body: "Applying to [company]",
        };
        let batch = generate_messages(source, &f, 3, &mut RandomPicker::seeded(1));
        assert_eq!(batch.messages.len(), 1);
        assert_eq!(batch.messages[0].body, "Applying to {Acme|Globex}");
    }

    #[test]
    fn test_generate_unique_messages() {
        let source = MessageSource {
            subject: None,
            body: "{Hi|Hello|Hey} [name], {thanks|thank you}!",
        };
        let f = fields(&[("name", "Sari")]);
        let batch = generate_messages(source, &f, 4, &mut RandomPicker::seeded(7));

        assert!(!batch.messages.is_empty() && batch.messages.len() <= 4);
        let unique: HashSet<_> = batch.messages.iter().collect();
        assert_eq!(unique.len(), batch.messages.len());
        for m in &batch.messages {
            assert!(m.body.contains("Sari"));
            assert!(m.subject.is_none());
        }
        assert!(batch.missing_fields.is_empty());
        assert!(batch.validation.valid);
    }

    #[test]
    fn test_generate_stops_when_variations_run_out() {
        let source = MessageSource {
            subject: None,
            body: "{Hi|Hello} there",
        };
        let batch = generate_messages(source, &HashMap::new(), 10, &mut RandomPicker::seeded(3));
        assert!(batch.messages.len() <= 2);
    }

    #[test]
    fn test_generate_with_subject_reports_missing_fields() {
        let source = MessageSource {
            subject: Some("{Following up|Follow-up} on [position]"),
            body: "Dear [name], {regards|thanks}",
        };
        let batch = generate_messages(source, &HashMap::new(), 2, &mut RandomPicker::seeded(9));
        assert_eq!(batch.missing_fields, vec!["name", "position"]);
        for m in &batch.messages {
            let subject = m.subject.as_deref().unwrap();
            assert!(subject.ends_with("on [position]"));
        }
    }

    #[test]
    fn test_generate_invalid_template_still_produces_output() {
        let source = MessageSource {
            subject: None,
            body: "{Hi|Hello there",
        };
        let batch = generate_messages(source, &HashMap::new(), 1, &mut RandomPicker::seeded(0));
        assert_eq!(batch.messages[0].body, "{Hi|Hello there");
        assert!(!batch.validation.valid);
    }

    #[test]
    fn test_huge_count_is_capped_by_template() {
        let source = MessageSource {
            subject: Some("{Hello|Hi}"),
            body: "{a|b|c} there",
        };
        let batch = generate_messages(
            source,
            &HashMap::new(),
            usize::MAX / 2,
            &mut RandomPicker::seeded(4),
        );
        assert!(!batch.messages.is_empty() && batch.messages.len() <= 6);
    }

    #[test]
    fn test_zero_count_generates_nothing() {
        let source = MessageSource {
            subject: None,
            body: "{a|b}",
        };
        let batch = generate_messages(source, &HashMap::new(), 0, &mut RandomPicker::seeded(0));
        assert!(batch.messages.is_empty());
    }
}
