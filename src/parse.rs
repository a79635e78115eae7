//! Derivation of catalog entries from raw source records.
//!
//! The source lists creatures as `{name, url}` pairs where the URL ends in
//! the creature's numeric identifier. The identifier drives both entry
//! identity and the synthesized sprite image URL.

use crate::NUMBER_MARKER;

/// Extracts the trailing numeric identifier from a source reference URL.
///
/// A trailing path separator is stripped first, so `.../pokemon/25/` and
/// `.../pokemon/6` yield 25 and 6 respectively. Returns `None` when the URL
/// does not end in digits.
#[must_use]
pub fn entry_number(reference_url: &str) -> Option<u32> {
    let trimmed = reference_url.strip_suffix('/').unwrap_or(reference_url);
    let prefix = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &trimmed[prefix.len()..];
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Substitutes the identifier into the sprite URL template.
#[must_use]
pub fn sprite_url(template: &str, number: u32) -> String {
    template.replace(NUMBER_MARKER, &number.to_string())
}

/// Uppercases the first character of a source name, leaving the rest as-is.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
