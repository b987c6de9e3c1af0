//! Pattern builder
//!
//! Compiles a language's lexicon into two matchers: the quantity grammar
//! (optional currency prefix, value, up to four operator/unit segments) and
//! the number-word grammar that finds runs of spelled-out numbers.
//!
//! The regex engine has no look-around. Word edges are written with
//! `\b{start-half}` / `\b{end-half}`. Two rules that need a real lookbehind or
//! lookahead are checked after each match instead: a value may not follow a
//! letter, digit, sign or dot, and a number-word run may not be followed by a
//! digit-based number.

use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;
use quantex_core::QuantError;
use quantex_lexicon::Units;
use quantex_plugin::{
    LexicalTables, NumberRun, QuantityMatch, Token, UnitSegment, SUPERSCRIPTS, VULGAR_FRACTIONS,
};

/// Chained operator/unit segments after a value
pub const SEGMENTS: usize = 4;

const OPERATOR_GROUPS: [&str; SEGMENTS] = ["operator1", "operator2", "operator3", "operator4"];
const UNIT_GROUPS: [&str; SEGMENTS] = ["unit1", "unit2", "unit3", "unit4"];

const SIZE_LIMIT: usize = 1 << 26;

/// Escaped alternation, longest item first (ties alphabetical). `None` if empty.
pub fn alternation<I, S>(items: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut items: Vec<String> = items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    items.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    items.dedup();
    if items.is_empty() {
        return None;
    }
    Some(items.iter().map(|s| regex::escape(s)).collect::<Vec<_>>().join("|"))
}

fn char_class(chars: impl IntoIterator<Item = char>) -> String {
    let inner: String = chars.into_iter().map(|c| regex::escape(&c.to_string())).collect();
    format!("[{}]", inner)
}

fn superscript_digits() -> String {
    SUPERSCRIPTS.iter().map(|(sup, _)| *sup).collect()
}

/// Digit-based number: sign, digits or a vulgar fraction, thousands groups,
/// decimals, an optional exponent (`e3`, `x10^3`, `10³`) and an optional
/// trailing fraction (` 1/2`, `½`, `/4`).
///
/// With `groups`, the parts are captured as `number`, `scale`, `base`,
/// `exponent` and `fraction`.
pub fn number_pattern(tables: &LexicalTables, groups: bool) -> String {
    let open = |name: &str| {
        if groups {
            format!("(?P<{}>", name)
        } else {
            "(?:".to_string()
        }
    };
    let fractions = char_class(VULGAR_FRACTIONS.iter().map(|(c, _)| *c));
    let superscripts = char_class(SUPERSCRIPTS.iter().map(|(c, _)| *c));
    let grouping = alternation(&tables.grouping_operators)
        .map(|g| format!(r"(?:(?:{})\d{{3}})*", g))
        .unwrap_or_default();
    let decimals = alternation(&tables.decimal_operators)
        .map(|d| format!(r"(?:(?:{})\d+)?", d))
        .unwrap_or_default();
    // a bare space between two numbers is grouping, never a multiplier
    let multipliers = alternation(tables.multiplication_operators.iter().filter(|m| !m.trim().is_empty()))
        .map(|m| format!("(?:{})?", m))
        .unwrap_or_default();

    format!(
        concat!(
            r"{number}[+-]?(?:\.?\d+|{fr}){grouping}{decimals})",
            r"(?:{scale}{mult}{base}[eE]|\d+\^?){exponent}[+-]?\d+|⁻?{sup}+)))?",
            r"{fraction} \d+/\d+| ?{fr}|/\d+)?",
        ),
        number = open("number"),
        fr = fractions,
        grouping = grouping,
        decimals = decimals,
        scale = open("scale"),
        mult = multipliers,
        base = open("base"),
        exponent = open("exponent"),
        sup = superscripts,
        fraction = open("fraction"),
    )
}

/// A number, optionally followed by a range or uncertainty marker and a second number
pub fn range_pattern(tables: &LexicalTables) -> String {
    let number = number_pattern(tables, false);
    let separators = alternation(tables.ranges.iter().chain(tables.uncertainties.iter()));
    match separators {
        Some(seps) => format!("{num}(?: ?(?:(?:- )?(?:{seps})) ?{num})?", num = number, seps = seps),
        None => number,
    }
}

/// One unit token: optional leading power word, a known spelling, an optional
/// numeric/superscript exponent and an optional trailing power word.
fn unit_token(tables: &LexicalTables, spellings: &str) -> String {
    let mut token = String::from("(?:");
    if let Some(leading) = alternation(tables.leading_powers.iter().map(|(w, _)| w)) {
        token.push_str(&format!("(?:(?:{}) )?", leading));
    }
    token.push_str(&format!(r"(?:{})(?:\^?[-⁻]?[0-9{}]+)?", spellings, superscript_digits()));
    if let Some(trailing) = alternation(tables.trailing_powers.iter().map(|(w, _)| w)) {
        token.push_str(&format!("(?: (?:{}))?", trailing));
    }
    token.push(')');
    token
}

/// Full quantity pattern for a lexicon
pub fn quantity_pattern(tables: &LexicalTables, units: &Units) -> String {
    let mut pattern = String::from(r"\b{start-half}");
    if let Some(prefixes) = alternation(units.prefix_symbols()) {
        pattern.push_str(&format!("(?P<prefix>{})?", prefixes));
    }
    pattern.push_str(&format!("(?P<value>{})[+-]?", range_pattern(tables)));

    let spellings = alternation(
        units
            .spellings()
            .chain(tables.suffixes.iter().map(|(s, _)| s.as_str())),
    );
    if let Some(spellings) = spellings {
        let token = unit_token(tables, &spellings);
        let operators = alternation(tables.operators());
        for i in 0..SEGMENTS {
            match &operators {
                Some(ops) => pattern.push_str(&format!(
                    "(?:(?P<{}>{})?(?P<{}>{}))?",
                    OPERATOR_GROUPS[i], ops, UNIT_GROUPS[i], token
                )),
                None => pattern.push_str(&format!("(?:(?P<{}>{}))?", UNIT_GROUPS[i], token)),
            }
        }
    }
    pattern.push_str(r"\b{end-half}");
    pattern
}

/// Single number word with word edges, or `None` if the language has none
fn number_word_pattern(tables: &LexicalTables) -> Option<String> {
    let words = tables.number_words();
    alternation(words.keys()).map(|w| format!(r"\b{{start-half}}(?:{})\b{{end-half}}", w))
}

/// Compile with a raised size limit; unit alternations get large
pub fn compile(pattern: &str, what: &str) -> Result<Regex, QuantError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(SIZE_LIMIT)
        .dfa_size_limit(SIZE_LIMIT)
        .build()
        .map_err(|e| QuantError::construction(format!("Cannot compile {} pattern: {}", what, e)))
}

/// True if `pos` is not preceded by a letter, digit, sign or dot ("Area51")
fn value_may_start(text: &str, pos: usize) -> bool {
    match text[..pos].chars().next_back() {
        Some(c) => !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        None => true,
    }
}

fn next_char(text: &str, pos: usize) -> usize {
    pos + text[pos..].chars().next().map_or(1, char::len_utf8)
}

fn token<'t>(caps: &Captures<'t>, name: &str) -> Option<Token<'t>> {
    caps.name(name).map(|m| Token::new(m.as_str(), m.start(), m.end()))
}

/// Compiled matchers for one language
#[derive(Debug, Clone)]
pub struct Grammar {
    quantity: Regex,
    number_run: Option<Regex>,
    number_word: Option<Regex>,
    /// `^\s?NUMBER`, checked after a number-word run
    leading_number: Regex,
}

impl Grammar {
    pub fn build(tables: &LexicalTables, units: &Units) -> Result<Self, QuantError> {
        let quantity = compile(&quantity_pattern(tables, units), "quantity")?;

        let number = number_pattern(tables, false);
        let word = number_word_pattern(tables);
        let number_run = match &word {
            Some(w) => Some(compile(
                &format!("(?P<lead>{num})?[, ]?{w}(?:[, -]*{w})*", num = number, w = w),
                "number word",
            )?),
            None => None,
        };
        let number_word = match &word {
            Some(w) => Some(compile(w, "number word")?),
            None => None,
        };
        let leading_number = compile(&format!(r"^\s?{}", number), "number")?;

        debug!(
            pattern_len = quantity.as_str().len(),
            number_words = number_word.is_some(),
            "grammar compiled"
        );
        Ok(Grammar { quantity, number_run, number_word, leading_number })
    }

    /// Source of the compiled quantity pattern
    pub fn pattern(&self) -> &str {
        self.quantity.as_str()
    }

    /// Every quantity mention in `text`, left to right, non-overlapping
    pub fn quantities<'t>(&self, text: &'t str) -> Vec<QuantityMatch<'t>> {
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let Some(caps) = self.quantity.captures_at(text, pos) else {
                break;
            };
            let (Some(whole), Some(value)) = (caps.get(0), caps.name("value")) else {
                break;
            };
            if !value_may_start(text, value.start()) {
                pos = next_char(text, whole.start());
                continue;
            }

            let mut segments = [UnitSegment::default(); SEGMENTS];
            for (i, segment) in segments.iter_mut().enumerate() {
                segment.operator = token(&caps, OPERATOR_GROUPS[i]);
                segment.unit = token(&caps, UNIT_GROUPS[i]);
            }
            out.push(QuantityMatch {
                haystack: text,
                start: whole.start(),
                end: whole.end(),
                prefix: token(&caps, "prefix"),
                value: Token::new(value.as_str(), value.start(), value.end()),
                segments,
            });
            pos = whole.end().max(next_char(text, whole.start()));
        }
        out
    }

    /// Maximal runs of number words ("two hundred and five", "5 million").
    ///
    /// A run is cut back to an earlier word when a digit-based number follows
    /// it, so "and" in "10 and 15" never joins a run.
    pub fn number_runs<'t>(&self, text: &'t str) -> Vec<NumberRun<'t>> {
        let (Some(run), Some(word)) = (&self.number_run, &self.number_word) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let Some(caps) = run.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let lead = caps.name("lead");
            if lead.is_some_and(|m| !value_may_start(text, m.start())) {
                pos = next_char(text, whole.start());
                continue;
            }

            let mut ends = Vec::new();
            let mut at = lead.map_or(whole.start(), |m| m.end());
            while let Some(m) = word.find_at(text, at) {
                if m.end() > whole.end() || m.is_empty() {
                    break;
                }
                ends.push(m.end());
                at = m.end();
            }
            let end = ends
                .iter()
                .rev()
                .copied()
                .find(|&end| !self.leading_number.is_match(&text[end..]));

            match end {
                Some(end) => {
                    out.push(Token::new(&text[whole.start()..end], whole.start(), end));
                    pos = end;
                }
                None => pos = next_char(text, whole.start()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::english_lexicon;
    use quantex_lang::en::English;
    use quantex_plugin::LanguagePlugin;

    fn grammar() -> Grammar {
        let lexicon = english_lexicon();
        Grammar::build(English::new().tables(), &lexicon.units).unwrap()
    }

    #[test]
    fn test_alternation_longest_first() {
        let alt = alternation(["m", "km", "kilometre", "mm", "$"]).unwrap();
        assert_eq!(alt, r"kilometre|km|mm|\$|m");
        assert_eq!(alternation(Vec::<String>::new()), None);
        assert_eq!(alternation(["a", "a", ""]).as_deref(), Some("a"));
    }

    #[test]
    fn test_number_pattern_groups() {
        let tables = English::new().tables().clone();
        let re = Regex::new(&number_pattern(&tables, true)).unwrap();
        let caps = re.captures("5x10³").unwrap();
        assert_eq!(&caps["number"], "5");
        assert_eq!(&caps["base"], "10");
        assert_eq!(&caps["exponent"], "³");
        let caps = re.captures("1,000,000.25").unwrap();
        assert_eq!(&caps["number"], "1,000,000.25");
        let caps = re.captures("2 1/2").unwrap();
        assert_eq!(&caps["fraction"], " 1/2");
    }

    #[test]
    fn test_simple_quantity() {
        let g = grammar();
        let text = "It was 12 km/h today";
        let found = g.quantities(text);
        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(m.as_str(), "12 km/h");
        assert_eq!(m.value.text, "12");
        assert_eq!(m.unit(1).map(|t| t.text), Some("km"));
        assert_eq!(m.operator(1).map(|t| t.text), Some(" "));
        assert_eq!(m.operator(2).map(|t| t.text), Some("/"));
        assert_eq!(m.unit(2).map(|t| t.text), Some("h"));
    }

    #[test]
    fn test_prefix_and_range() {
        let g = grammar();
        let found = g.quantities("I want $20/h and 10-15 km");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].prefix.map(|t| t.text), Some("$"));
        assert_eq!(found[0].value.text, "20");
        assert_eq!(found[1].value.text, "10-15");
        assert_eq!(found[1].unit(1).map(|t| t.text), Some("km"));
    }

    #[test]
    fn test_value_boundary() {
        let g = grammar();
        assert!(g.quantities("Area51").is_empty());
        assert!(g.quantities("x5 m").is_empty());
    }

    #[test]
    fn test_unit_exponents_and_words() {
        let g = grammar();
        let found = g.quantities("a room of 20 m² and 3 square feet");
        let units: Vec<&str> = found.iter().filter_map(|m| m.unit(1)).map(|t| t.text).collect();
        assert_eq!(units, vec!["m²", "square feet"]);
    }

    #[test]
    fn test_number_runs() {
        let g = grammar();
        let text = "two hundred and five apples, 5 million people";
        let runs: Vec<&str> = g.number_runs(text).iter().map(|r| r.text).collect();
        assert_eq!(runs, vec!["two hundred and five", "5 million"]);
    }

    #[test]
    fn test_number_run_not_followed_by_number() {
        let g = grammar();
        let runs: Vec<&str> = g.number_runs("between 10 and 15 km").iter().map(|r| r.text).collect();
        assert!(runs.is_empty());
        let runs: Vec<&str> = g.number_runs("Seventy 5").iter().map(|r| r.text).collect();
        assert!(runs.is_empty());
    }
}
