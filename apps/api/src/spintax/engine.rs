//! Spintax parse-and-use path: resolution, enumeration and segmentation.
//!
//! Every function here is pure. Malformed templates are never rejected;
//! the block scan simply skips anything it cannot match (a dangling `{`
//! stays part of the surrounding literal run). Linting lives in
//! [`crate::spintax::lint`] and is never called from here.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use regex::{Captures, Regex};
use serde::Serialize;

/// Maximum number of mixed-radix combinations `get_all_variations` evaluates.
pub const MAX_VARIATIONS: usize = 100;

/// One alternation block: `{` + non-brace characters + `}`.
static BLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Option picking
// ────────────────────────────────────────────────────────────────────────────

/// Chooses which option of a block to use during `resolve_with`.
///
/// Implementations must return an index in `0..option_count`; anything
/// larger is wrapped back into range by the resolver.
pub trait OptionPicker {
    fn pick(&mut self, option_count: usize) -> usize;
}

/// Uniform picker backed by any `rand` generator.
pub struct RandomPicker<R: Rng>(R);

impl RandomPicker<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl RandomPicker<StdRng> {
    /// Reproducible picker: the same seed yields the same choices.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> OptionPicker for RandomPicker<R> {
    fn pick(&mut self, option_count: usize) -> usize {
        if option_count <= 1 {
            return 0;
        }
        self.0.random_range(0..option_count)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A highlighted slice of the original template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub is_spintax: bool,
}

enum Part<'a> {
    Literal(&'a str),
    Block(usize),
}

fn split_options(interior: &str) -> Vec<String> {
    interior.split('|').map(|o| o.trim().to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

/// Resolves every block with a uniformly random option.
pub fn resolve(text: &str) -> String {
    resolve_with(text, &mut RandomPicker::thread())
}

/// Resolves every block, left to right, asking `picker` for each choice.
pub fn resolve_with(text: &str, picker: &mut impl OptionPicker) -> String {
    BLOCK_RE
        .replace_all(text, |caps: &Captures| {
            let options = split_options(&caps[1]);
            let index = picker.pick(options.len()) % options.len();
            options[index].clone()
        })
        .into_owned()
}

/// Trimmed options of each block, in left-to-right order.
pub fn extract_options(text: &str) -> Vec<Vec<String>> {
    BLOCK_RE
        .captures_iter(text)
        .map(|caps| split_options(&caps[1]))
        .collect()
}

/// Number of blocks in the template.
pub fn count_spintax(text: &str) -> usize {
    BLOCK_RE.find_iter(text).count()
}

/// Theoretical number of combinations (product of option counts).
///
/// Returns 1 for a template without blocks. Saturates at `u64::MAX`.
/// This is not the length of [`get_all_variations`], which is capped and
/// deduplicated.
pub fn get_variation_count(text: &str) -> u64 {
    extract_options(text)
        .iter()
        .fold(1u64, |acc, options| acc.saturating_mul(options.len() as u64))
}

/// Enumerates up to [`MAX_VARIATIONS`] combinations, deduplicated in order.
///
/// Index `i` is decoded mixed-radix over the blocks in template order:
/// `i % n` picks the option of the current block, then `i /= n`. When the
/// product exceeds the cap only indices `0..MAX_VARIATIONS` are visited,
/// so the result is deterministic but skewed toward varying the first
/// blocks; later blocks mostly keep their first option.
pub fn get_all_variations(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut blocks: Vec<Vec<String>> = Vec::new();
    let mut last = 0;

    for caps in BLOCK_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            parts.push(Part::Literal(&text[last..whole.start()]));
        }
        parts.push(Part::Block(blocks.len()));
        blocks.push(split_options(&caps[1]));
        last = whole.end();
    }

    if blocks.is_empty() {
        return vec![text.to_string()];
    }
    if last < text.len() {
        parts.push(Part::Literal(&text[last..]));
    }

    let total = blocks
        .iter()
        .fold(1usize, |acc, options| acc.saturating_mul(options.len()));
    let limit = total.min(MAX_VARIATIONS);

    let mut seen = HashSet::new();
    let mut variations = Vec::with_capacity(limit);
    let mut choice = vec![0usize; blocks.len()];

    for i in 0..limit {
        let mut rest = i;
        for (slot, options) in choice.iter_mut().zip(&blocks) {
            *slot = rest % options.len();
            rest /= options.len();
        }

        let candidate: String = parts
            .iter()
            .map(|part| match part {
                Part::Literal(s) => *s,
                Part::Block(b) => blocks[*b][choice[*b]].as_str(),
            })
            .collect();

        if seen.insert(candidate.clone()) {
            variations.push(candidate);
        }
    }

    variations
}

/// Splits the template into literal runs and raw blocks (braces kept).
pub fn highlight(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in BLOCK_RE.find_iter(text) {
        if m.start() > last {
            segments.push(Segment {
                text: text[last..m.start()].to_string(),
                is_spintax: false,
            });
        }
        segments.push(Segment {
            text: m.as_str().to_string(),
            is_spintax: true,
        });
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment {
            text: text[last..].to_string(),
            is_spintax: false,
        });
    }

    segments
}
