//! Unit-token splitting and text cleanup shared by the language packs

use std::sync::OnceLock;
use regex::Regex;
use quantex_plugin::{normalize_superscripts, LexicalTables};

fn exponent_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\^?[-⁻]?[0-9¹²³⁴⁵⁶⁷⁸⁹⁰]+").unwrap())
}

/// Split a unit token into its bare surface and signed power using the
/// language's power words: "m²", "metres squared", "cubic feet", "mét vuông"
pub fn parse_unit_token(tables: &LexicalTables, token: &str, inverted: bool) -> (String, i32) {
    let surface = token.replace('.', "");
    let sign = if inverted { -1 } else { 1 };

    if let Some(m) = exponent_regex().find(&surface) {
        let digits = normalize_superscripts(m.as_str().trim_start_matches('^'));
        if let Ok(power) = digits.parse::<i32>() {
            let mut bare = surface.clone();
            bare.replace_range(m.range(), "");
            return (bare.trim().to_string(), sign * power);
        }
    }

    // ASCII lowercasing keeps byte offsets valid for non-ASCII words
    let lower = surface.to_ascii_lowercase();
    for (word, power) in &tables.leading_powers {
        if lower.starts_with(word.as_str()) && lower[word.len()..].starts_with(' ') {
            return (surface[word.len()..].trim().to_string(), sign * power);
        }
    }
    for (word, power) in &tables.trailing_powers {
        if lower.ends_with(word.as_str()) && lower[..lower.len() - word.len()].ends_with(' ') {
            return (surface[..surface.len() - word.len()].trim().to_string(), sign * power);
        }
    }

    (surface.trim().to_string(), sign)
}

/// Replace no-break and thin spaces with plain spaces of equal byte length
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{a0}' | '\u{202f}' | '\u{2009}' => {
                for _ in 0..c.len_utf8() {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }
    out
}
