// Spintax template engine: `{option one|option two}` alternation blocks.
//
// Two independent capabilities:
// - engine: parse-and-use (resolve, enumerate, highlight); never rejects input
// - lint: advisory validation for callers that want to gate on it

pub mod engine;
pub mod handlers;
pub mod lint;

pub use engine::{
    count_spintax, extract_options, get_all_variations, get_variation_count, highlight, resolve,
    resolve_with, OptionPicker, RandomPicker, Segment, MAX_VARIATIONS,
};
pub use lint::{validate, ValidationReport};
