//! Per-language lexical tables

use std::collections::BTreeMap;
use serde::Serialize;

/// Unicode superscript digits and their ASCII equivalents
pub const SUPERSCRIPTS: [(char, char); 10] = [
    ('¹', '1'), ('²', '2'), ('³', '3'), ('⁴', '4'), ('⁵', '5'),
    ('⁶', '6'), ('⁷', '7'), ('⁸', '8'), ('⁹', '9'), ('⁰', '0'),
];

/// Superscript minus sign
pub const SUPERSCRIPT_MINUS: char = '⁻';

/// Unicode vulgar fractions and their ASCII `n/d` spelling
pub const VULGAR_FRACTIONS: [(char, &str); 18] = [
    ('¼', "1/4"), ('½', "1/2"), ('¾', "3/4"), ('⅐', "1/7"), ('⅑', "1/9"), ('⅒', "1/10"),
    ('⅓', "1/3"), ('⅔', "2/3"), ('⅕', "1/5"), ('⅖', "2/5"), ('⅗', "3/5"), ('⅘', "4/5"),
    ('⅙', "1/6"), ('⅚', "5/6"), ('⅛', "1/8"), ('⅜', "3/8"), ('⅝', "5/8"), ('⅞', "7/8"),
];

/// Map superscript digits (and the superscript minus) to ASCII, leaving other chars alone
pub fn normalize_superscripts(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c == SUPERSCRIPT_MINUS {
                return '-';
            }
            SUPERSCRIPTS
                .iter()
                .find(|(sup, _)| *sup == c)
                .map(|(_, ascii)| *ascii)
                .unwrap_or(c)
        })
        .collect()
}

pub fn is_superscript(c: char) -> bool {
    c == SUPERSCRIPT_MINUS || SUPERSCRIPTS.iter().any(|(sup, _)| *sup == c)
}

pub fn vulgar_fraction(c: char) -> Option<&'static str> {
    VULGAR_FRACTIONS.iter().find(|(f, _)| *f == c).map(|(_, ascii)| *ascii)
}

/// How a number word contributes to a spelled-out number
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberWord {
    /// Multiplier applied to the running value ("thousand" = 1000)
    pub scale: f64,
    /// Amount added after scaling ("seven" = 7)
    pub increment: f64,
}

/// Lexical tables a language supplies to the pattern builder and value resolver.
///
/// Operator sets are complete: the core adds nothing to them. Multi-word
/// entries in the number tables are written with `_` between words
/// ("one_half"), matching the text after core cleaning.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LexicalTables {
    /// Number words zero..nineteen, indexed by value
    pub units: Vec<String>,
    /// Tens words indexed by tens digit; indices 0 and 1 are empty
    pub tens: Vec<String>,
    /// Scale words: index 0 is hundred, index n >= 1 is 10^(3n). Each scale may have several spellings
    pub scales: Vec<Vec<String>>,
    /// Fraction words ("half" = 0.5)
    pub decimals: Vec<(String, f64)>,
    /// Conjunctions and articles with explicit (scale, increment)
    pub misc_numbers: Vec<(String, NumberWord)>,
    /// Colloquial magnitude suffixes ("5k")
    pub suffixes: Vec<(String, f64)>,
    pub multiplication_operators: Vec<String>,
    pub division_operators: Vec<String>,
    /// Thousands separators
    pub grouping_operators: Vec<String>,
    pub decimal_operators: Vec<String>,
    /// Range markers between two numbers ("-", "to")
    pub ranges: Vec<String>,
    /// Plus-minus markers ("±", "+/-")
    pub uncertainties: Vec<String>,
    /// Power words following a unit ("squared")
    pub trailing_powers: Vec<(String, i32)>,
    /// Power words preceding a unit ("square")
    pub leading_powers: Vec<(String, i32)>,
}

impl LexicalTables {
    /// Every number word with its contribution. Later tables win on collisions
    /// except that misc words are inserted first.
    pub fn number_words(&self) -> BTreeMap<String, NumberWord> {
        let mut words = BTreeMap::new();
        for (word, nw) in &self.misc_numbers {
            words.insert(word.clone(), *nw);
        }
        for (idx, word) in self.units.iter().enumerate() {
            words.insert(word.clone(), NumberWord { scale: 1.0, increment: idx as f64 });
        }
        for (idx, word) in self.tens.iter().enumerate() {
            words.insert(word.clone(), NumberWord { scale: 1.0, increment: (idx * 10) as f64 });
        }
        for (idx, spellings) in self.scales.iter().enumerate() {
            let exp = if idx == 0 { 2 } else { idx as i32 * 3 };
            for word in spellings {
                words.insert(word.clone(), NumberWord { scale: 10f64.powi(exp), increment: 0.0 });
            }
        }
        for (word, factor) in &self.decimals {
            words.insert(word.clone(), NumberWord { scale: *factor, increment: 0.0 });
        }
        words.remove("");
        words
    }

    /// Number words spelled with `_`, as they appear in raw text (with spaces)
    pub fn multi_word_numbers(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .units
            .iter()
            .chain(self.tens.iter())
            .chain(self.scales.iter().flatten())
            .chain(self.decimals.iter().map(|(w, _)| w))
            .filter(|w| w.contains('_'))
            .map(|w| w.replace('_', " "))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    pub fn suffix(&self, token: &str) -> Option<f64> {
        self.suffixes.iter().find(|(s, _)| s == token).map(|(_, f)| *f)
    }

    pub fn is_multiplication_operator(&self, op: &str) -> bool {
        self.multiplication_operators.iter().any(|m| m == op)
    }

    /// True if `op` contains any division operator
    pub fn is_division_operator(&self, op: &str) -> bool {
        self.division_operators.iter().any(|d| op.contains(d.as_str()))
    }

    /// Multiplication and division operators together
    pub fn operators(&self) -> Vec<String> {
        let mut ops: Vec<String> = self
            .multiplication_operators
            .iter()
            .chain(self.division_operators.iter())
            .cloned()
            .collect();
        ops.sort();
        ops.dedup();
        ops
    }

    pub fn power_word(&self, word: &str) -> Option<i32> {
        self.trailing_powers
            .iter()
            .chain(self.leading_powers.iter())
            .find(|(w, _)| w.eq_ignore_ascii_case(word))
            .map(|(_, p)| *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> LexicalTables {
        LexicalTables {
            units: strings(&["zero", "one", "two"]),
            tens: strings(&["", "", "twenty"]),
            scales: vec![strings(&["hundred"]), strings(&["thousand"]), strings(&["million"])],
            decimals: vec![("half".to_string(), 0.5), ("one_half".to_string(), 0.5)],
            misc_numbers: vec![("and".to_string(), NumberWord { scale: 1.0, increment: 0.0 })],
            suffixes: vec![("k".to_string(), 1e3)],
            multiplication_operators: strings(&["*", " "]),
            division_operators: strings(&["/", " per "]),
            trailing_powers: vec![("squared".to_string(), 2)],
            leading_powers: vec![("cubic".to_string(), 3)],
            ..Default::default()
        }
    }

    #[test]
    fn test_number_words() {
        let words = sample().number_words();
        assert_eq!(words["two"], NumberWord { scale: 1.0, increment: 2.0 });
        assert_eq!(words["twenty"].increment, 20.0);
        assert_eq!(words["hundred"].scale, 100.0);
        assert_eq!(words["thousand"].scale, 1000.0);
        assert_eq!(words["million"].scale, 1e6);
        assert_eq!(words["half"].scale, 0.5);
        assert!(!words.contains_key(""));
    }

    #[test]
    fn test_multi_word_numbers() {
        assert_eq!(sample().multi_word_numbers(), vec!["one half".to_string()]);
    }

    #[test]
    fn test_operators() {
        let t = sample();
        assert!(t.is_multiplication_operator(" "));
        assert!(t.is_division_operator(" per "));
        assert!(t.is_division_operator("/"));
        assert!(!t.is_division_operator("*"));
        assert_eq!(t.operators().len(), 4);
        assert_eq!(t.suffix("k"), Some(1e3));
        assert_eq!(t.power_word("Squared"), Some(2));
        assert_eq!(t.power_word("cubic"), Some(3));
    }

    #[test]
    fn test_superscripts() {
        assert_eq!(normalize_superscripts("m⁻²"), "m-2");
        assert!(is_superscript('³'));
        assert_eq!(vulgar_fraction('½'), Some("1/2"));
        assert_eq!(vulgar_fraction('x'), None);
    }
}
