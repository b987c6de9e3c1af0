//! Value resolver
//!
//! Turns the captured value text ("1,500", "10-15", "2 1/2", "5x10³",
//! "10 +/- 2") into a number and an optional uncertainty.

use regex::Regex;
use quantex_core::QuantError;
use quantex_plugin::{is_superscript, normalize_superscripts, vulgar_fraction, LexicalTables};
use crate::grammar::{alternation, compile, number_pattern};

/// Numeric value of a match; a range becomes its midpoint and half-width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedValue {
    pub value: f64,
    pub uncertainty: Option<f64>,
}

/// Compiled helpers for resolving value text in one language
#[derive(Debug, Clone)]
pub struct ValuePatterns {
    number: Regex,
    exponent_marker: Option<Regex>,
    range_separator: Option<Regex>,
    uncertainty_separator: Option<Regex>,
    fraction: Regex,
    grouping: Vec<String>,
}

fn separator(items: &[String], what: &str) -> Result<Option<Regex>, QuantError> {
    match alternation(items) {
        Some(alt) => compile(&format!(r"\d ?((?:- )?(?:{})) ?\d", alt), what).map(Some),
        None => Ok(None),
    }
}

fn not_a_number(text: &str) -> QuantError {
    QuantError::value(format!("'{}' is not a number", text))
}

/// Parse one number, tolerating a dangling minus ("5-")
fn parse_float(text: &str) -> Result<f64, QuantError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.parse::<f64>().map_err(|_| not_a_number(text))
}

fn parse_fraction(text: &str) -> Result<f64, QuantError> {
    let (num, den) = text.split_once('/').ok_or_else(|| not_a_number(text))?;
    let num = parse_float(num)?;
    let den = parse_float(den)?;
    if den == 0.0 {
        return Err(not_a_number(text));
    }
    Ok(num / den)
}

impl ValuePatterns {
    pub fn build(tables: &LexicalTables) -> Result<Self, QuantError> {
        let number = compile(&number_pattern(tables, true), "number")?;
        let exponent_marker = match alternation(&tables.multiplication_operators) {
            Some(ops) => Some(compile(&format!(r"(\d)(?:{})(?:e|E|10)\^?([+-]?\d)", ops), "exponent")?),
            None => None,
        };
        Ok(ValuePatterns {
            number,
            exponent_marker,
            range_separator: separator(&tables.ranges, "range")?,
            uncertainty_separator: separator(&tables.uncertainties, "uncertainty")?,
            fraction: compile(r"\d+/\d+", "fraction")?,
            grouping: tables.grouping_operators.iter().filter(|g| !g.is_empty()).cloned().collect(),
        })
    }

    /// Resolve captured value text.
    ///
    /// Steps, in order: thousands separators, `x10^n` markers, remaining
    /// exponents, vulgar fractions, then classification as range,
    /// uncertainty, fraction or plain number.
    pub fn resolve(&self, raw: &str) -> Result<ResolvedValue, QuantError> {
        let mut text = self.strip_grouping(raw);
        if let Some(marker) = &self.exponent_marker {
            text = marker.replace_all(&text, "${1}e${2}").into_owned();
        }
        let (stripped, factors) = self.resolve_exponents(&text)?;

        let mut expanded = String::with_capacity(stripped.len() + 4);
        for c in stripped.chars() {
            match vulgar_fraction(c) {
                Some(ascii) => {
                    expanded.push(' ');
                    expanded.push_str(ascii);
                }
                None => expanded.push(c),
            }
        }
        let text = expanded.split_whitespace().collect::<Vec<_>>().join(" ");
        let factor = |i: usize| factors.get(i).copied().unwrap_or(1.0);

        if let Some(at) = split_at(self.range_separator.as_ref(), &text) {
            let low = parse_float(&text[..at.0])? * factor(0);
            let high = parse_float(&text[at.1..])? * factor(1);
            if high < low {
                return Err(QuantError::value(format!(
                    "invalid range '{}', second value smaller than first",
                    raw
                )));
            }
            let mean = (low + high) / 2.0;
            return Ok(ResolvedValue { value: mean, uncertainty: Some(mean - low) });
        }

        if let Some(at) = split_at(self.uncertainty_separator.as_ref(), &text) {
            let value = parse_float(&text[..at.0])? * factor(0);
            let uncertainty = parse_float(&text[at.1..])? * factor(1);
            return Ok(ResolvedValue { value, uncertainty: Some(uncertainty) });
        }

        if self.fraction.is_match(&text) {
            let parts: Vec<&str> = text.split_whitespace().collect();
            let value = match parts.as_slice() {
                [whole, fraction] => parse_float(whole)? * factor(0) + parse_fraction(fraction)?,
                [fraction] => parse_fraction(fraction)?,
                _ => return Err(not_a_number(raw)),
            };
            return Ok(ResolvedValue { value, uncertainty: None });
        }

        Ok(ResolvedValue { value: parse_float(&text)? * factor(0), uncertainty: None })
    }

    /// Drop a grouping separator between a digit and three more digits
    fn strip_grouping(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            let rest = &raw[i..];
            if let Some(sep) = self.grouping.iter().find(|g| rest.starts_with(g.as_str())) {
                let after = rest[sep.len()..].as_bytes();
                let after_digits = after.len() >= 3 && after[..3].iter().all(u8::is_ascii_digit);
                let before_digit = out.chars().next_back().is_some_and(|c| c.is_ascii_digit());
                if after_digits && before_digit {
                    i += sep.len();
                    continue;
                }
            }
            let Some(c) = rest.chars().next() else {
                break;
            };
            out.push(c);
            i += c.len_utf8();
        }
        out
    }

    /// One factor per number in `text`. A power of ten written with a caret or
    /// superscript ("10^3", "10³") is folded into the factor and removed from
    /// the text; `e` notation and bare digits are left for the float parser.
    fn resolve_exponents(&self, text: &str) -> Result<(String, Vec<f64>), QuantError> {
        let mut stripped = text.to_string();
        let mut factors = Vec::new();
        for caps in self.number.captures_iter(text) {
            let (Some(scale), Some(base), Some(exponent)) =
                (caps.name("scale"), caps.name("base"), caps.name("exponent"))
            else {
                factors.push(1.0);
                continue;
            };
            let base = base.as_str();
            let exponent = exponent.as_str();
            let superscript = exponent.chars().any(is_superscript);
            if base.eq_ignore_ascii_case("e") || (!base.ends_with('^') && !superscript) {
                factors.push(1.0);
                continue;
            }
            let base_value = parse_float(base.trim_end_matches('^'))?;
            let power: i32 = normalize_superscripts(exponent)
                .parse()
                .map_err(|_| not_a_number(exponent))?;
            factors.push(base_value.powi(power));
            stripped = stripped.replacen(scale.as_str(), "", 1);
        }
        Ok((stripped, factors))
    }
}

/// Byte range of the separator captured by `pattern`
fn split_at(pattern: Option<&Regex>, text: &str) -> Option<(usize, usize)> {
    let sep = pattern?.captures(text)?.get(1)?;
    Some((sep.start(), sep.end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantex_lang::en::English;
    use quantex_plugin::LanguagePlugin;

    fn patterns() -> ValuePatterns {
        ValuePatterns::build(English::new().tables()).unwrap()
    }

    fn value(raw: &str) -> f64 {
        patterns().resolve(raw).unwrap().value
    }

    #[test]
    fn test_plain_and_grouped() {
        assert_eq!(value("12"), 12.0);
        assert_eq!(value("1,500"), 1500.0);
        assert_eq!(value("1,000,000.25"), 1_000_000.25);
        assert_eq!(value("5 000"), 5000.0);
        assert_eq!(value(".5"), 0.5);
        assert_eq!(value("-3"), -3.0);
    }

    #[test]
    fn test_exponents() {
        assert_eq!(value("2.5e3"), 2500.0);
        assert_eq!(value("5x10^3"), 5000.0);
        assert_eq!(value("5x10³"), 5000.0);
        assert_eq!(value("1.5*10^3"), 1500.0);
        assert!((value("3·10⁻²") - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_fractions() {
        assert_eq!(value("1/2"), 0.5);
        assert_eq!(value("2 1/2"), 2.5);
        assert_eq!(value("½"), 0.5);
        assert_eq!(value("3¼"), 3.25);
    }

    #[test]
    fn test_zero_denominator() {
        let err = patterns().resolve("1/0").unwrap_err();
        assert!(matches!(err, QuantError::Value(_)));
        assert!(err.to_string().contains("is not a number"));
    }

    #[test]
    fn test_range() {
        let v = patterns().resolve("10-15").unwrap();
        assert_eq!(v, ResolvedValue { value: 12.5, uncertainty: Some(2.5) });
        let v = patterns().resolve("10 to 20").unwrap();
        assert_eq!(v, ResolvedValue { value: 15.0, uncertainty: Some(5.0) });
    }

    #[test]
    fn test_inverted_range() {
        let err = patterns().resolve("15-10").unwrap_err();
        assert!(err.to_string().contains("invalid range"));
    }

    #[test]
    fn test_uncertainty() {
        let v = patterns().resolve("10 +/- 2").unwrap();
        assert_eq!(v, ResolvedValue { value: 10.0, uncertainty: Some(2.0) });
        let v = patterns().resolve("7±0.5").unwrap();
        assert_eq!(v, ResolvedValue { value: 7.0, uncertainty: Some(0.5) });
    }

    #[test]
    fn test_dangling_minus() {
        assert_eq!(parse_float("5-").unwrap(), 5.0);
        assert!(parse_float("abc").is_err());
    }
}
