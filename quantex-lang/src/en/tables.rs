//! English lexical tables

use quantex_plugin::{LexicalTables, NumberWord};

const UNITS: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [&str; 5] = ["hundred", "thousand", "million", "billion", "trillion"];

const DECIMALS: [(&str, f64); 8] = [
    ("half", 0.5),
    ("third", 1.0 / 3.0),
    ("fourth", 0.25),
    ("quarter", 0.25),
    ("fifth", 0.2),
    ("sixth", 1.0 / 6.0),
    ("seventh", 1.0 / 7.0),
    ("eighth", 0.125),
];

/// Articles count as "one" but never form a number on their own
pub const ARTICLES: [&str; 2] = ["a", "an"];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

pub fn tables() -> LexicalTables {
    LexicalTables {
        units: owned(&UNITS),
        tens: owned(&TENS),
        scales: SCALES.iter().map(|s| vec![s.to_string()]).collect(),
        decimals: DECIMALS.iter().map(|(w, f)| (w.to_string(), *f)).collect(),
        misc_numbers: vec![
            ("and".to_string(), NumberWord { scale: 1.0, increment: 0.0 }),
            ("a".to_string(), NumberWord { scale: 1.0, increment: 1.0 }),
            ("an".to_string(), NumberWord { scale: 1.0, increment: 1.0 }),
        ],
        suffixes: vec![
            ("k".to_string(), 1e3),
            ("K".to_string(), 1e3),
            ("M".to_string(), 1e6),
            ("B".to_string(), 1e9),
            ("T".to_string(), 1e12),
        ],
        multiplication_operators: owned(&["*", " ", "·", "x", " times "]),
        division_operators: owned(&["/", " per ", " a "]),
        grouping_operators: owned(&[",", " "]),
        decimal_operators: owned(&["."]),
        ranges: owned(&["-", "to", "and"]),
        uncertainties: owned(&["+/-", "±", "+", "plus minus"]),
        trailing_powers: vec![("squared".to_string(), 2), ("cubed".to_string(), 3)],
        leading_powers: vec![("square".to_string(), 2), ("cubic".to_string(), 3)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_words() {
        let words = tables().number_words();
        assert_eq!(words["nineteen"].increment, 19.0);
        assert_eq!(words["ninety"].increment, 90.0);
        assert_eq!(words["trillion"].scale, 1e12);
        assert_eq!(words["an"], NumberWord { scale: 1.0, increment: 1.0 });
        assert_eq!(words["quarter"].scale, 0.25);
    }

    #[test]
    fn test_operator_sets() {
        let t = tables();
        assert!(t.is_division_operator(" per "));
        assert!(t.is_multiplication_operator(" times "));
        assert_eq!(t.suffix("K"), Some(1e3));
        assert!(t.multi_word_numbers().is_empty());
    }
}
