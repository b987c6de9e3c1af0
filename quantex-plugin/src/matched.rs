//! Engine-neutral view of a grammar match
//!
//! Plugins never see the regex engine's own match type; the parser copies the
//! capture groups into these structs so the matching engine can change without
//! touching language code.

use std::sync::Arc;
use quantex_core::Unit;

/// A captured substring with its byte offsets in the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    pub start: usize,
    pub end: usize,
}

impl<'t> Token<'t> {
    pub fn new(text: &'t str, start: usize, end: usize) -> Self {
        Token { text, start, end }
    }

    pub fn as_str(&self) -> &'t str {
        self.text
    }
}

/// A maximal run of number words found by the spelled-number grammar
pub type NumberRun<'t> = Token<'t>;

/// One `(operator, unit)` pair of a quantity match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitSegment<'t> {
    pub operator: Option<Token<'t>>,
    pub unit: Option<Token<'t>>,
}

/// A quantity mention: optional currency prefix, value and up to four unit segments
#[derive(Debug, Clone)]
pub struct QuantityMatch<'t> {
    /// The (cleaned) text the match was found in
    pub haystack: &'t str,
    pub start: usize,
    pub end: usize,
    pub prefix: Option<Token<'t>>,
    pub value: Token<'t>,
    pub segments: [UnitSegment<'t>; 4],
}

impl<'t> QuantityMatch<'t> {
    pub fn as_str(&self) -> &'t str {
        &self.haystack[self.start..self.end]
    }

    /// Unit token by group index: 0 is the prefix, 1..=4 the segments
    pub fn unit(&self, index: usize) -> Option<Token<'t>> {
        match index {
            0 => self.prefix,
            n => self.segments.get(n - 1).and_then(|s| s.unit),
        }
    }

    /// Operator token by group index; index 0 never has one
    pub fn operator(&self, index: usize) -> Option<Token<'t>> {
        match index {
            0 => None,
            n => self.segments.get(n - 1).and_then(|s| s.operator),
        }
    }

    /// True if neither a prefix nor any unit was captured
    pub fn is_unitless(&self) -> bool {
        (0..=4).all(|i| self.unit(i).is_none())
    }

    /// Text following the match in the haystack
    pub fn trailing(&self) -> &'t str {
        &self.haystack[self.end..]
    }

    /// Text preceding the match in the haystack
    pub fn leading(&self) -> &'t str {
        &self.haystack[..self.start]
    }
}

/// Replacement of a spelled-out number by digits
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub old_span: (usize, usize),
    pub old_surface: String,
    pub new_surface: String,
}

/// Everything a language needs to post-process a quantity
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// Input as given by the caller
    pub original: &'a str,
    /// Cleaned text with spelled numbers substituted
    pub text: &'a str,
    pub matched: &'a QuantityMatch<'a>,
    /// Unit to fall back to when a rule strips every unit token
    pub dimensionless: &'a Arc<Unit>,
}
