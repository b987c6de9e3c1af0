//! Vietnamese lexical tables
//!
//! Multi-word number words are written with `_` ("mười_một"); the core joins
//! them in the input before matching.

use quantex_plugin::{LexicalTables, NumberWord};

const UNITS: [&str; 20] = [
    "không", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín", "mười",
    "mười_một", "mười_hai", "mười_ba", "mười_bốn", "mười_lăm", "mười_sáu", "mười_bảy", "mười_tám", "mười_chín",
];

const TENS: [&str; 10] = [
    "", "", "hai_mươi", "ba_mươi", "bốn_mươi", "năm_mươi", "sáu_mươi", "bảy_mươi", "tám_mươi", "chín_mươi",
];

const SCALES: [&[&str]; 5] = [
    &["trăm"],
    &["nghìn", "ngàn"],
    &["triệu"],
    &["tỷ", "tỉ"],
    &["nghìn_tỷ", "ngàn_tỷ", "nghìn_tỉ", "ngàn_tỉ"],
];

const DECIMALS: [(&str, f64); 8] = [
    ("một_phần_hai", 0.5),
    ("một_phần_ba", 1.0 / 3.0),
    ("một_phần_tư", 0.25),
    ("một_phần_năm", 0.2),
    ("một_phần_sáu", 1.0 / 6.0),
    ("một_phần_bảy", 1.0 / 7.0),
    ("một_phần_tám", 0.125),
    ("một_phần_chín", 1.0 / 9.0),
];

/// Conjunctions joining number words
pub const FILLERS: [&str; 4] = ["và", "&", "linh", "lẻ"];

/// Digit spellings used after a tens word ("hai mươi mốt" = 21)
const TENS_DIGITS: [(&str, f64); 3] = [("mốt", 1.0), ("tư", 4.0), ("lăm", 5.0)];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

pub fn tables() -> LexicalTables {
    let mut misc_numbers: Vec<(String, NumberWord)> = FILLERS
        .iter()
        .map(|w| (w.to_string(), NumberWord { scale: 1.0, increment: 0.0 }))
        .collect();
    misc_numbers.extend(
        TENS_DIGITS
            .iter()
            .map(|(w, n)| (w.to_string(), NumberWord { scale: 1.0, increment: *n })),
    );

    LexicalTables {
        units: owned(&UNITS),
        tens: owned(&TENS),
        scales: SCALES.iter().map(|spellings| owned(spellings)).collect(),
        decimals: DECIMALS.iter().map(|(w, f)| (w.to_string(), *f)).collect(),
        misc_numbers,
        suffixes: vec![
            ("k".to_string(), 1e3),
            ("K".to_string(), 1e3),
            ("M".to_string(), 1e6),
            ("B".to_string(), 1e9),
            ("T".to_string(), 1e12),
        ],
        multiplication_operators: owned(&["*", " ", "·", "x", " lần "]),
        division_operators: owned(&["/", " mỗi ", " trên ", "per"]),
        grouping_operators: owned(&[",", " "]),
        decimal_operators: owned(&["."]),
        ranges: owned(&["-", "đến", "tới"]),
        uncertainties: owned(&["+/-", "±", "+", "cộng trừ", "xấp xỉ"]),
        trailing_powers: vec![("vuông".to_string(), 2), ("khối".to_string(), 3)],
        leading_powers: Vec::new(),
    }
}
