//! Spelled-out numbers ("two hundred and five", "3 and a half") to digits

use std::collections::BTreeMap;
use quantex_plugin::{LexicalTables, NumberRun, NumberWord, Substitution};
use super::tables::ARTICLES;

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

fn convert(tables: &LexicalTables, words: &BTreeMap<String, NumberWord>, run: &NumberRun<'_>) -> Option<Substitution> {
    let (surface, span) = trim_surface(tables, run.text, (run.start, run.end))?;
    let lower = surface.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();

    if tokens.iter().all(|t| ARTICLES.contains(t)) {
        return None;
    }
    if tokens.len() == 1 && tables.scales.iter().flatten().any(|s| s == tokens[0]) {
        return None;
    }

    let value = evaluate(tables, words, &tokens)?;
    Some(Substitution {
        old_span: span,
        old_surface: surface.to_string(),
        new_surface: format!("{}", value),
    })
}

/// Strip leading/trailing "and", spaces and trailing articles; drop a leading
/// article or "one" when a units or tens word follows ("a twenty" -> "twenty").
fn trim_surface<'t>(tables: &LexicalTables, text: &'t str, span: (usize, usize)) -> Option<(&'t str, (usize, usize))> {
    let (mut start, mut end) = (0usize, text.len());
    loop {
        let current = &text[start..end];
        let lower = current.to_ascii_lowercase();
        if lower.starts_with(' ') || lower.starts_with('-') || lower.starts_with(',') {
            start += 1;
        } else if lower.starts_with("and ") || lower == "and" {
            start += 3;
        } else if lower.ends_with(' ') || lower.ends_with('-') || lower.ends_with(',') {
            end -= 1;
        } else if lower.ends_with(" and") {
            end -= 4;
        } else if let Some(article) = ARTICLES.iter().find(|a| lower.ends_with(&format!(" {}", a))) {
            // "10 a day": the article belongs to the unit
            end -= article.len() + 1;
        } else {
            break;
        }
        if start >= end {
            return None;
        }
    }

    let current = &text[start..end];
    let mut parts = current.splitn(2, |c: char| c == ' ' || c == '-');
    let first = parts.next().unwrap_or_default().to_lowercase();
    if let Some(rest) = parts.next() {
        let second = rest
            .split(|c: char| c == ' ' || c == '-')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let leading_one = first == "one" || ARTICLES.contains(&first.as_str());
        let follows_small = tables.units.contains(&second) || tables.tens.iter().any(|t| !t.is_empty() && *t == second);
        if leading_one && follows_small {
            start += first.len() + 1;
        }
    }

    Some((&text[start..end], (span.0 + start, span.0 + end)))
}

/// Accumulate number words: `curr = curr * scale + increment`, flushing into the
/// result after any scale above a hundred. Fraction words add to a preceding
/// number ("2 and a half" = 2.5) or stand alone ("a quarter" = 0.25).
fn evaluate(tables: &LexicalTables, words: &BTreeMap<String, NumberWord>, tokens: &[&str]) -> Option<f64> {
    let mut curr = 0.0;
    let mut result = 0.0;
    let mut after_one = false;

    for raw in tokens.iter().flat_map(|t| t.split('-')).filter(|t| !t.is_empty()) {
        if let Some(number) = parse_digits(tables, raw) {
            curr += number;
            after_one = false;
            continue;
        }
        let word = words.get(raw)?;
        let is_fraction = tables.decimals.iter().any(|(w, _)| w == raw);
        if is_fraction {
            if after_one {
                curr -= 1.0;
            }
            if result + curr > 0.0 {
                curr += word.scale;
            } else {
                curr = word.scale;
            }
            after_one = false;
            continue;
        }
        curr = curr * word.scale + word.increment;
        if word.scale > 100.0 {
            result += curr;
            curr = 0.0;
        }
        after_one = raw == "one" || ARTICLES.contains(&raw);
    }
    Some(result + curr)
}

/// A digit token inside a run ("5" in "5 million"), grouping separators removed
fn parse_digits(tables: &LexicalTables, token: &str) -> Option<f64> {
    if !token.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let cleaned: String = token
        .trim_end_matches('-')
        .chars()
        .filter(|c| !tables.grouping_operators.iter().any(|g| g.starts_with(*c)))
        .collect();
    cleaned.parse().ok()
}
