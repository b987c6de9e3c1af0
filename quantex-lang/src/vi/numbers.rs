//! Spelled-out Vietnamese numbers ("hai mươi lăm", "ba nghìn năm trăm") to digits
//!
//! A run is read word by word and ends early at the first word that cannot
//! continue the number: a digit word after another digit word ("mười năm" is
//! ten years, not fifteen), any word after a digit other than a scale ("5 năm" is five years), or a tens
//! digit ("lăm", "mốt") that does not follow a tens word.

use std::collections::BTreeMap;
use quantex_plugin::{LexicalTables, NumberRun, NumberWord, Substitution};
use super::tables::FILLERS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Digits,
    Unit,
    Tens,
    TensDigit,
    Scale,
    Fraction,
    Filler,
}

fn kind(tables: &LexicalTables, word: &str) -> Kind {
    if FILLERS.contains(&word) {
        Kind::Filler
    } else if tables.units.iter().any(|u| u == word) {
        Kind::Unit
    } else if tables.tens.iter().any(|t| t == word) {
        Kind::Tens
    } else if tables.scales.iter().flatten().any(|s| s == word) {
        Kind::Scale
    } else if tables.decimals.iter().any(|(d, _)| d == word) {
        Kind::Fraction
    } else {
        Kind::TensDigit
    }
}

/// Whether `next` may follow `prev` inside one number
fn continues(prev: Option<Kind>, next: Kind) -> bool {
    match (prev, next) {
        (_, Kind::Filler) | (_, Kind::Scale) | (_, Kind::Fraction) => true,
        (None, Kind::TensDigit) | (Some(Kind::Unit), Kind::TensDigit) => false,
        (None, _) => true,
        (Some(Kind::Digits), _) => false,
        (Some(Kind::Unit), Kind::Unit | Kind::Tens) => false,
        (Some(Kind::Tens), Kind::Tens) => false,
        (Some(Kind::TensDigit), Kind::Unit | Kind::Tens | Kind::TensDigit) => false,
        (Some(Kind::Tens), Kind::TensDigit) => true,
        (Some(Kind::Fraction), Kind::Unit | Kind::Tens | Kind::TensDigit) => false,
        _ => true,
    }
}

/// Convert every run of number words to a digit substitution
pub fn extract(tables: &LexicalTables, runs: &[NumberRun<'_>]) -> Vec<Substitution> {
    let words = tables.number_words();
    let mut out: Vec<Substitution> = runs
        .iter()
        .filter_map(|run| convert(tables, &words, run))
        .collect();
    out.sort_by_key(|s| s.old_span.0);
    out
}

/// Words of a run with their byte ranges inside it; a trailing comma is not
/// part of the word
fn split(text: &str) -> Vec<(usize, usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    let mut push = |s: usize, e: usize| {
        let word = text[s..e].trim_end_matches(',');
        if !word.is_empty() {
            out.push((s, s + word.len(), word));
        }
    };
    for (i, c) in text.char_indices() {
        let separator = c == ' ' || c == '-';
        match (start, separator) {
            (None, false) => start = Some(i),
            (Some(s), true) => {
                push(s, i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push(s, text.len());
    }
    out
}

fn convert(tables: &LexicalTables, words: &BTreeMap<String, NumberWord>, run: &NumberRun<'_>) -> Option<Substitution> {
    let mut curr = 0.0;
    let mut result = 0.0;
    let mut prev: Option<Kind> = None;
    let mut span: Option<(usize, usize)> = None;
    let mut numeric = false;
    let mut spelled = false;

    for (start, end, raw) in split(run.text) {
        let lower = raw.to_lowercase();
        let digits = parse_digits(tables, &lower);
        let kind = match digits {
            Some(_) => Kind::Digits,
            None if words.contains_key(&lower) => kind(tables, &lower),
            None => break,
        };
        // fillers neither start nor end a number
        if kind == Kind::Filler {
            continue;
        }
        if !continues(prev, kind) {
            break;
        }

        match (kind, digits) {
            (_, Some(number)) => curr += number,
            (Kind::Fraction, None) => {
                let factor = words[&lower].scale;
                if result + curr > 0.0 {
                    curr += factor;
                } else {
                    curr = factor;
                }
            }
            (_, None) => {
                let word = words[&lower];
                curr = curr * word.scale + word.increment;
                if word.scale > 100.0 {
                    result += curr;
                    curr = 0.0;
                }
            }
        }
        numeric |= kind != Kind::Scale;
        spelled |= kind != Kind::Digits;
        prev = Some(kind);
        span = Some((span.map_or(start, |s| s.0), end));
    }

    let (start, end) = span?;
    if !(numeric && spelled) {
        return None;
    }
    Some(Substitution {
        old_span: (run.start + start, run.start + end),
        old_surface: run.text[start..end].to_string(),
        new_surface: format!("{}", result + curr),
    })
}

/// A digit token leading a run ("5" in "5 triệu"), grouping separators removed
fn parse_digits(tables: &LexicalTables, token: &str) -> Option<f64> {
    if !token.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let cleaned: String = token
        .chars()
        .filter(|c| !tables.grouping_operators.iter().any(|g| g.starts_with(*c)))
        .collect();
    cleaned.parse().ok()
}
